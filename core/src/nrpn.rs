//! Parameter writes as NRPN controller bursts.

use log::*;
use crate::catalog::ParameterCatalog;
use crate::error::AddressError;
use crate::midi::MidiMessage;

pub const NRPN_MSB: u8 = 0x63;
pub const NRPN_LSB: u8 = 0x62;
pub const DATA_ENTRY_MSB: u8 = 0x06;
pub const DATA_ENTRY_LSB: u8 = 0x26;

/// One 14-bit address / 14-bit value pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NrpnEvent {
    pub address: u16,
    pub value: u16,
}

impl NrpnEvent {
    /// Negative values go out as 14-bit two's complement.
    pub fn new(address: u16, value: i32) -> Self {
        NrpnEvent { address: address & 0x3fff, value: (value as u16) & 0x3fff }
    }

    /// The four controller messages of this event, in wire order.
    pub fn messages(&self, channel: u8) -> [MidiMessage; 4] {
        let cc = |control: u8, value: u16| MidiMessage::ControlChange {
            channel, control, value: (value & 0x7f) as u8
        };
        [
            cc(NRPN_MSB, self.address >> 7),
            cc(NRPN_LSB, self.address),
            cc(DATA_ENTRY_MSB, self.value >> 7),
            cc(DATA_ENTRY_LSB, self.value),
        ]
    }
}

pub fn resolve(catalog: &ParameterCatalog, slot: usize) -> Result<u16, AddressError> {
    catalog.effective_address(slot)
}

/// Write of a single slot at its current address. `None` if the slot has
/// no wire address right now.
pub fn write(catalog: &ParameterCatalog, slot: usize) -> Option<NrpnEvent> {
    match resolve(catalog, slot) {
        Ok(address) => Some(NrpnEvent::new(address, catalog.nrpn_value(slot))),
        Err(e) => {
            trace!("{:?}: {}", catalog.definition(slot).name, e);
            None
        }
    }
}

/// Re-send every slot parameter owned by `selector` at the address the
/// selector's current value gives it.
pub fn cascade(catalog: &ParameterCatalog, selector: usize) -> Vec<NrpnEvent> {
    catalog.owned_slots(selector).into_iter()
        .filter_map(|slot| write(catalog, slot))
        .collect()
}

/// Selector edit: the selector's own index, then the cascade. List
/// overrides do not apply to the selector burst.
pub fn write_selector(catalog: &ParameterCatalog, selector: usize) -> Vec<NrpnEvent> {
    let own = resolve(catalog, selector).ok()
        .map(|address| NrpnEvent::new(address, catalog.get(selector)));
    own.into_iter()
        .chain(cascade(catalog, selector))
        .collect()
}

/// Everything a write of `slot` puts on the wire.
pub fn write_param(catalog: &ParameterCatalog, slot: usize) -> Vec<NrpnEvent> {
    if catalog.definition(slot).is_selector() {
        write_selector(catalog, slot)
    } else {
        write(catalog, slot).into_iter().collect()
    }
}

/// One write per live, addressable slot in catalog order.
pub fn sync_all(catalog: &ParameterCatalog) -> Vec<NrpnEvent> {
    (0 .. catalog.len())
        .filter(|&slot| !catalog.is_shadowed(slot))
        .filter_map(|slot| write(catalog, slot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::shorthand::*;
    use crate::model::ParameterDefinition;

    const S: usize = 1;
    const P: usize = 2;

    fn catalog() -> ParameterCatalog {
        let params: Vec<ParameterDefinition> = vec![
            param("volume").nrpn(5).default(100).into(),
            param("fx_type").range(0, 3).nrpn(600).selector(700 ..= 703).into(),
            param("fx_amount").range(0, 100).default(37).nrpn(700)
                .slot_of("fx_type", &[Some(700), Some(701), Some(702), Some(703)]).into(),
            param("fx_tone").range(0, 100).default(9).nrpn(701)
                .slot_of("fx_type", &[None, None, None, Some(710)]).into(),
            param("lfo_sync").values(&["off", "1/4", "1/8"])
                .value_nrpn("1/16", 999).nrpn(40).into(),
            param("aliased").nrpn(640).into(),
            param("internal").nrpn(2100).into(),
            param("derived").into(),
        ];
        ParameterCatalog::new(params).unwrap()
    }

    #[test]
    fn burst_messages_are_masked_and_ordered() {
        let msgs = NrpnEvent::new(190, 999).messages(2);
        let bytes = msgs.iter().map(|m| m.to_bytes()).collect::<Vec<_>>();
        assert_eq!(bytes, vec![
            vec![0xb2, 0x63, 0x01],
            vec![0xb2, 0x62, 0x3e],
            vec![0xb2, 0x06, 0x07],
            vec![0xb2, 0x26, 0x67],
        ]);
    }

    #[test]
    fn negative_values_are_twos_complement() {
        let e = NrpnEvent::new(3, -5);
        assert_eq!(e.value, 0x3ffb);
        let bytes = e.messages(0).iter().map(|m| m.to_bytes()[2]).collect::<Vec<_>>();
        assert_eq!(bytes, vec![0x00, 0x03, 0x7f, 0x7b]);
    }

    #[test]
    fn selector_write_cascades_to_owned_slots() {
        let mut c = catalog();
        c.set(S, 2);
        assert_eq!(write_param(&c, S), vec![
            NrpnEvent::new(88, 2),
            NrpnEvent::new(190, 37),
        ]);

        c.set(S, 3);
        assert_eq!(write_param(&c, S), vec![
            NrpnEvent::new(88, 3),
            NrpnEvent::new(191, 37),
            NrpnEvent::new(198, 9),
        ]);
    }

    #[test]
    fn selector_burst_sends_its_index() {
        let params: Vec<ParameterDefinition> = vec![
            param("fx_type").values(&["bypass", "chorus"]).value_nrpn("delay", 77)
                .nrpn(600).selector(700 ..= 709).into(),
            param("fx_mix").nrpn(700)
                .slot_of("fx_type", &[None, Some(700), Some(701)]).into(),
        ];
        let mut c = ParameterCatalog::new(params).unwrap();
        c.set(0, 2);
        assert_eq!(write_param(&c, 0), vec![
            NrpnEvent::new(88, 2),
            NrpnEvent::new(189, 0),
        ]);
    }

    #[test]
    fn cascade_carries_unchanged_values() {
        let mut c = catalog();
        c.set(P, 64);
        c.set(S, 1);
        assert_eq!(cascade(&c, S), vec![NrpnEvent::new(189, 64)]);
        assert_eq!(c.get(P), 64);
    }

    #[test]
    fn list_override_is_sent() {
        let mut c = catalog();
        let slot = c.find("lfo_sync").unwrap();
        c.set(slot, 3);
        assert_eq!(write(&c, slot), Some(NrpnEvent::new(40, 999)));
        c.set(slot, 2);
        assert_eq!(write(&c, slot), Some(NrpnEvent::new(40, 2)));
    }

    #[test]
    fn aliased_and_unaddressable_writes() {
        let c = catalog();
        assert_eq!(write(&c, c.find("aliased").unwrap()), Some(NrpnEvent::new(128, 0)));
        assert_eq!(write(&c, c.find("internal").unwrap()), None);
        assert_eq!(write(&c, c.find("derived").unwrap()), None);
        assert_eq!(write(&c, c.find("fx_tone").unwrap()), None);
    }

    #[test]
    fn sync_all_skips_shadowed_and_unaddressable() {
        let c = catalog();
        assert_eq!(sync_all(&c), vec![
            NrpnEvent::new(5, 100),
            NrpnEvent::new(88, 0),
            NrpnEvent::new(188, 37),
            NrpnEvent::new(40, 0),
            NrpnEvent::new(128, 0),
        ]);
    }

    #[test]
    fn sync_all_of_unaddressable_catalog_is_empty() {
        let params: Vec<ParameterDefinition> = vec![
            param("a").into(),
            param("b").nrpn(4000).into(),
        ];
        let c = ParameterCatalog::new(params).unwrap();
        assert!(sync_all(&c).is_empty());
        assert!(sync_all(&ParameterCatalog::new(vec![]).unwrap()).is_empty());
    }
}
