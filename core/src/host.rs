//! Host-facing parameter list: the NRPN-addressable slots, in catalog
//! order, exposed as float parameters.

use crate::catalog::ParameterCatalog;
use crate::sync::SyncController;

pub struct HostParameters {
    slots: Box<[usize]>
}

impl HostParameters {
    pub fn new(catalog: &ParameterCatalog) -> Self {
        let slots = (0 .. catalog.len())
            .filter(|&i| catalog.definition(i).nrpn.is_some())
            .collect::<Vec<_>>();
        HostParameters { slots: slots.into_boxed_slice() }
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Option<usize> {
        self.slots.get(index).copied()
    }

    pub fn index_of(&self, slot: usize) -> Option<usize> {
        self.slots.iter().position(|&s| s == slot)
    }

    pub fn get(&self, sync: &SyncController, index: usize) -> Option<f32> {
        self.slot(index).map(|slot| sync.catalog().get(slot) as f32)
    }

    /// Host values are truncated toward zero before they are stored.
    pub fn set(&self, sync: &mut SyncController, index: usize, value: f32) -> Option<f32> {
        let slot = self.slot(index)?;
        sync.edit(slot, value as i32).map(|v| v as f32)
    }

    pub fn name<'a>(&self, sync: &'a SyncController, index: usize) -> Option<&'a str> {
        self.slot(index).map(|slot| sync.catalog().definition(slot).name.as_str())
    }

    pub fn text(&self, sync: &SyncController, index: usize) -> Option<String> {
        let catalog = sync.catalog();
        self.slot(index).map(|slot| catalog.definition(slot).display(catalog.get(slot)))
    }

    pub fn min(&self, sync: &SyncController, index: usize) -> Option<f32> {
        self.slot(index).map(|slot| sync.catalog().definition(slot).from as f32)
    }

    pub fn max(&self, sync: &SyncController, index: usize) -> Option<f32> {
        self.slot(index).map(|slot| sync.catalog().definition(slot).to as f32)
    }

    pub fn default(&self, sync: &SyncController, index: usize) -> Option<f32> {
        self.slot(index).map(|slot| sync.catalog().definition(slot).default as f32)
    }

    pub fn steps(&self, sync: &SyncController, index: usize) -> Option<i32> {
        self.slot(index).map(|slot| sync.catalog().definition(slot).steps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::shorthand::*;
    use crate::model::{Config, ParameterDefinition};

    fn controller() -> SyncController {
        let params: Vec<ParameterDefinition> = vec![
            param("hidden").range(0, 3).into(),
            percent("level").nrpn(1).default(80).into(),
            bipolar("pan", 64).nrpn(2).into(),
            param("wave").values(&["sine", "saw"]).nrpn(3).into(),
        ];
        let config = Config { name: "test".into(), product: 0x22, channel: 0, params };
        SyncController::new(&config).unwrap()
    }

    #[test]
    fn only_addressable_slots_are_exposed() {
        let sync = controller();
        let host = HostParameters::new(sync.catalog());
        assert_eq!(host.count(), 3);
        assert_eq!(host.slot(0), Some(1));
        assert_eq!(host.index_of(3), Some(2));
        assert_eq!(host.index_of(0), None);
        assert_eq!(host.name(&sync, 1), Some("pan"));
        assert_eq!(host.slot(3), None);
    }

    #[test]
    fn float_values_are_truncated_and_clamped() {
        let mut sync = controller();
        let host = HostParameters::new(sync.catalog());
        assert_eq!(host.set(&mut sync, 1, -12.9), Some(-12.0));
        assert_eq!(host.get(&sync, 1), Some(-12.0));
        assert_eq!(host.set(&mut sync, 0, 250.0), Some(100.0));
        assert_eq!(host.set(&mut sync, 9, 1.0), None);
    }

    #[test]
    fn describes_parameters() {
        let mut sync = controller();
        let host = HostParameters::new(sync.catalog());
        assert_eq!(host.text(&sync, 0), Some("80%".to_string()));
        assert_eq!(host.min(&sync, 1), Some(-64.0));
        assert_eq!(host.max(&sync, 1), Some(64.0));
        assert_eq!(host.default(&sync, 0), Some(80.0));
        assert_eq!(host.steps(&sync, 1), Some(128));

        host.set(&mut sync, 2, 1.0);
        assert_eq!(host.text(&sync, 2), Some("saw".to_string()));
    }
}
