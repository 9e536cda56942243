mod config;

pub use config::MICRON_CONFIG;

use micron_core::model::Config;

pub fn config() -> &'static Config {
    &MICRON_CONFIG
}

#[cfg(test)]
mod tests {
    use micron_core::address::physical_address;
    use micron_core::host::HostParameters;
    use micron_core::nrpn;
    use micron_core::sysex::DATA_BITS;
    use micron_core::ParameterCatalog;
    use super::*;

    fn catalog() -> ParameterCatalog {
        ParameterCatalog::new(config().params.clone()).unwrap()
    }

    #[test]
    fn catalog_builds() {
        let c = catalog();
        assert!(c.len() > 80);
        let last = (0 .. c.len()).map(|i| c.field(i).end()).max().unwrap();
        assert!(last <= DATA_BITS);
    }

    #[test]
    fn selectors_own_their_slots() {
        let c = catalog();
        let fx1 = c.find("fx1_type").unwrap();
        let fx2 = c.find("fx2_type").unwrap();

        let names = |s: usize| c.owned_slots(s).into_iter()
            .map(|i| c.definition(i).name.clone())
            .collect::<Vec<_>>();
        assert_eq!(names(fx1), vec!["fx1_mix", "fx1_rate", "fx1_depth", "fx1_feedback", "fx1_sibilance"]);
        assert_eq!(names(fx2), vec!["fx2_mix", "fx2_time", "fx2_feedback", "fx2_decay", "fx2_damping"]);
    }

    #[test]
    fn bypassed_effects_shadow_every_slot() {
        let c = catalog();
        for selector in ["fx1_type", "fx2_type"] {
            let s = c.find(selector).unwrap();
            assert_eq!(c.get(s), 0);
            assert!(c.owned_slots(s).into_iter().all(|i| c.is_shadowed(i)));
            assert!(nrpn::cascade(&c, s).is_empty());
        }
    }

    #[test]
    fn selectors_live_in_the_aliased_range() {
        let c = catalog();
        let fx1 = c.find("fx1_type").unwrap();
        assert_eq!(c.definition(fx1).nrpn.and_then(physical_address), Some(88));
        assert_eq!(c.effective_address(fx1), Ok(88));
    }

    #[test]
    fn changing_delay_to_reverb_moves_slots() {
        let mut c = catalog();
        let fx2 = c.find("fx2_type").unwrap();
        c.set(fx2, 1);
        let delay = nrpn::write_selector(&c, fx2);
        c.set(fx2, 4);
        let reverb = nrpn::write_selector(&c, fx2);

        // selector + mix + time + feedback
        assert_eq!(delay.len(), 4);
        // selector + mix + decay + damping
        assert_eq!(reverb.len(), 4);
        assert_eq!(reverb[0].value, 4);
        assert_ne!(delay[1].address, reverb[1].address);
    }

    #[test]
    fn tracking_generator_is_not_sent() {
        let c = catalog();
        let slot = c.find("tracking_points").unwrap();
        assert!(nrpn::write(&c, slot).is_none());
        assert!(nrpn::sync_all(&c).iter().all(|e| e.address < 2048));
    }

    #[test]
    fn host_sees_addressable_parameters() {
        let c = catalog();
        let host = HostParameters::new(&c);
        assert_eq!(host.count(), c.len() - 1); // "category" has no NRPN
    }
}
