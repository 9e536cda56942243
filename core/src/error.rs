use thiserror::Error;

/// A bulk image that cannot be taken apart. The image is discarded and
/// no parameter is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("bad image length: expected {expected}, got {actual}")]
    BadLength { expected: usize, actual: usize },
    #[error("bad image framing: {0}")]
    BadFraming(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("no parameter mapped to NRPN {0}")]
    UnknownAddress(u16),
    #[error("parameter {0} has no wire address")]
    Unaddressable(usize),
}

/// Problems found while building a catalog from its definitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate parameter name {0:?}")]
    DuplicateName(String),
    #[error("NRPN {address} used by both {first:?} and {second:?}")]
    AddressConflict { address: u16, first: String, second: String },
    #[error("parameter {param:?} refers to unknown effect selector {selector:?}")]
    UnknownSelector { param: String, selector: String },
    #[error("slot parameter {0:?} has no NRPN address inside its selector's range")]
    BadSlot(String),
    #[error("parameter {0:?} has an empty or inverted range")]
    BadRange(String),
    #[error("parameter {0:?} default value is out of range")]
    BadDefault(String),
    #[error("parameter {0:?} value list does not match its range")]
    BadValueList(String),
    #[error("parameter {0:?} sysex field is invalid or overlaps another field")]
    BadField(String),
}
