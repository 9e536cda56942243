//! Logical to physical NRPN address mapping.
//!
//! Logical addresses `512 .. 2048` alias onto the physical range
//! `0 .. 1536`; logical addresses from 2048 up have no wire meaning.

pub const ALIAS_OFFSET: u16 = 512;
pub const UNADDRESSABLE: u16 = 2048;

pub fn physical_address(logical: u16) -> Option<u16> {
    match logical {
        a if a >= UNADDRESSABLE => None,
        a if a >= ALIAS_OFFSET => Some(a - ALIAS_OFFSET),
        a => Some(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_alias_offset_is_unchanged() {
        assert_eq!(physical_address(0), Some(0));
        assert_eq!(physical_address(88), Some(88));
        assert_eq!(physical_address(511), Some(511));
    }

    #[test]
    fn aliased_range_is_shifted() {
        assert_eq!(physical_address(512), Some(0));
        assert_eq!(physical_address(600), Some(88));
        assert_eq!(physical_address(702), Some(190));
        assert_eq!(physical_address(2047), Some(1535));
    }

    #[test]
    fn beyond_threshold_is_unaddressable() {
        assert_eq!(physical_address(2048), None);
        assert_eq!(physical_address(2100), None);
        assert_eq!(physical_address(u16::MAX), None);
    }
}
