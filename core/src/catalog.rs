use std::collections::HashMap;
use log::*;
use tokio::sync::broadcast;
use crate::address::physical_address;
use crate::error::{AddressError, CatalogError};
use crate::model::*;
use crate::store::*;
use crate::sysex::DATA_BITS;

/// Ordered parameter definitions plus the live value of each slot.
pub struct ParameterCatalog {
    store: StoreBase<usize>,
    params: Box<[ParameterDefinition]>,
    fields: Box<[Field]>,
    values: Box<[i32]>,
    dirty: Box<[bool]>,
    /// Every logical address a slot can take, whatever its selector says.
    by_address: HashMap<u16, Vec<usize>>,
    selectors: Box<[Option<usize>]>,
}

impl ParameterCatalog {
    pub fn new(params: Vec<ParameterDefinition>) -> Result<Self, CatalogError> {
        let mut by_name = HashMap::new();
        for (i, p) in params.iter().enumerate() {
            if p.from > p.to {
                return Err(CatalogError::BadRange(p.name.clone()));
            }
            if !p.range().contains(&p.default) {
                return Err(CatalogError::BadDefault(p.name.clone()));
            }
            if !p.values.is_empty() && (p.from != 0 || p.to != p.values.len() as i32 - 1) {
                return Err(CatalogError::BadValueList(p.name.clone()));
            }
            if by_name.insert(p.name.as_str(), i).is_some() {
                return Err(CatalogError::DuplicateName(p.name.clone()));
            }
        }

        let mut by_nrpn = HashMap::new();
        for (i, p) in params.iter().enumerate() {
            let Some(address) = p.nrpn else { continue };
            if let Some(prev) = by_nrpn.insert(address, i) {
                return Err(CatalogError::AddressConflict {
                    address,
                    first: params[prev].name.clone(),
                    second: p.name.clone()
                });
            }
        }

        let selectors = params.iter()
            .map(|p| owning_selector(p, &params, &by_name))
            .collect::<Result<Vec<_>, _>>()?;
        check_live_addresses(&params, &selectors)?;

        let by_address = candidate_addresses(&params);
        let fields = assign_fields(&params)?;
        let values = params.iter().map(|p| p.default).collect::<Vec<_>>();
        let dirty = vec![false; params.len()];

        Ok(ParameterCatalog {
            store: StoreBase::new(params.len() * 2),
            params: params.into_boxed_slice(),
            fields: fields.into_boxed_slice(),
            values: values.into_boxed_slice(),
            dirty: dirty.into_boxed_slice(),
            by_address,
            selectors: selectors.into_boxed_slice(),
        })
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn definition(&self, slot: usize) -> &ParameterDefinition {
        &self.params[slot]
    }

    pub fn definitions(&self) -> &[ParameterDefinition] {
        &self.params
    }

    pub fn field(&self, slot: usize) -> Field {
        self.fields[slot]
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Current value of `slot`.
    ///
    /// # Panics
    /// If `slot` is not a slot of this catalog.
    pub fn get(&self, slot: usize) -> i32 {
        self.values[slot]
    }

    /// Store `value` clamped into the slot's range and return what was
    /// stored. A slot whose value changed is marked for notification.
    pub fn set(&mut self, slot: usize, value: i32) -> i32 {
        let value = self.params[slot].clamp(value);
        if self.values[slot] != value {
            trace!("set {:?} = {}", self.params[slot].name, value);
            self.values[slot] = value;
            self.dirty[slot] = true;
        }
        value
    }

    /// Wire value of the slot: the list override for the current item if
    /// there is one, the value itself otherwise.
    pub fn nrpn_value(&self, slot: usize) -> i32 {
        self.params[slot].nrpn_value(self.values[slot])
    }

    /// Slot currently living at logical `address`. Slot parameters answer
    /// only at the address their selector gives them right now.
    pub fn resolve_nrpn(&self, address: u16) -> Result<usize, AddressError> {
        self.by_address.get(&address)
            .and_then(|slots| {
                slots.iter().copied().find(|&slot| self.logical_address(slot) == Some(address))
            })
            .ok_or(AddressError::UnknownAddress(address))
    }

    pub fn selector_of(&self, slot: usize) -> Option<usize> {
        self.selectors[slot]
    }

    /// Logical address of `slot` right now. Slot parameters follow the
    /// current value of their selector, so this is never cached.
    pub fn logical_address(&self, slot: usize) -> Option<u16> {
        match &self.params[slot].role {
            Role::EffectSlotParameter { addresses, .. } => {
                let selector = self.selectors[slot]?;
                let choice = self.values[selector] - self.params[selector].from;
                let choice = usize::try_from(choice).ok()?;
                addresses.get(choice).copied().flatten()
            }
            _ => self.params[slot].nrpn
        }
    }

    /// Physical wire address of `slot` considering its role.
    pub fn effective_address(&self, slot: usize) -> Result<u16, AddressError> {
        self.logical_address(slot)
            .and_then(physical_address)
            .ok_or(AddressError::Unaddressable(slot))
    }

    /// `true` for a slot parameter the current effect does not use.
    pub fn is_shadowed(&self, slot: usize) -> bool {
        self.selectors[slot].is_some() && self.logical_address(slot).is_none()
    }

    /// Slot parameters belonging to `selector`, in catalog order.
    pub fn owned_slots(&self, selector: usize) -> Vec<usize> {
        let Role::EffectSelector { slots } = &self.params[selector].role else {
            return vec![];
        };
        (0 .. self.params.len())
            .filter(|&i| self.selectors[i] == Some(selector))
            .filter(|&i| self.params[i].nrpn.map(|a| slots.contains(&a)).unwrap_or(false))
            .collect()
    }

    /// Notify observers of every slot changed since the last notification.
    pub fn notify(&mut self, origin: Origin) {
        for slot in 0 .. self.dirty.len() {
            if self.dirty[slot] {
                self.store.send_signal(slot, true, origin, Signal::Change);
                self.dirty[slot] = false;
            }
        }
    }

    /// Notify observers of every slot, changed or not.
    pub fn notify_all(&mut self, origin: Origin) {
        for slot in 0 .. self.dirty.len() {
            self.store.send_signal(slot, self.dirty[slot], origin, Signal::Force);
            self.dirty[slot] = false;
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event<usize>> {
        self.store.subscribe()
    }
}

fn candidate_addresses(params: &[ParameterDefinition]) -> HashMap<u16, Vec<usize>> {
    let mut map: HashMap<u16, Vec<usize>> = HashMap::new();
    for (i, p) in params.iter().enumerate() {
        match &p.role {
            Role::EffectSlotParameter { addresses, .. } => {
                for a in addresses.iter().flatten() {
                    let slots = map.entry(*a).or_default();
                    if !slots.contains(&i) {
                        slots.push(i);
                    }
                }
            }
            _ => {
                if let Some(a) = p.nrpn {
                    map.entry(a).or_default().push(i);
                }
            }
        }
    }
    map
}

fn owning_selector(param: &ParameterDefinition,
                   params: &[ParameterDefinition],
                   by_name: &HashMap<&str, usize>) -> Result<Option<usize>, CatalogError> {
    let Role::EffectSlotParameter { selector, .. } = &param.role else {
        return Ok(None);
    };
    let found = by_name.get(selector.as_str())
        .and_then(|&i| match &params[i].role {
            Role::EffectSelector { slots } => Some((i, slots)),
            _ => None
        });
    let Some((idx, slots)) = found else {
        return Err(CatalogError::UnknownSelector {
            param: param.name.clone(),
            selector: selector.clone()
        });
    };
    if !param.nrpn.map(|a| slots.contains(&a)).unwrap_or(false) {
        return Err(CatalogError::BadSlot(param.name.clone()));
    }

    Ok(Some(idx))
}

/// No two slots that can be live at the same time may share a physical
/// address. Slot parameters of one selector are only live together when
/// they are addressable under the same selector value.
fn check_live_addresses(params: &[ParameterDefinition],
                        selectors: &[Option<usize>]) -> Result<(), CatalogError> {
    // physical address -> [(slot, selector value)]
    let mut live: HashMap<u16, Vec<(usize, Option<usize>)>> = HashMap::new();
    for (i, p) in params.iter().enumerate() {
        match &p.role {
            Role::EffectSlotParameter { addresses, .. } => {
                for (choice, a) in addresses.iter().enumerate() {
                    let Some(phys) = a.and_then(physical_address) else { continue };
                    live.entry(phys).or_default().push((i, Some(choice)));
                }
            }
            _ => {
                let Some(phys) = p.nrpn.and_then(physical_address) else { continue };
                live.entry(phys).or_default().push((i, None));
            }
        }
    }

    for (address, users) in live.iter() {
        for (n, &(a, a_choice)) in users.iter().enumerate() {
            for &(b, b_choice) in users[n + 1 ..].iter() {
                if a == b {
                    continue;
                }
                let exclusive = selectors[a].is_some() && selectors[a] == selectors[b] &&
                    a_choice != b_choice;
                if !exclusive {
                    return Err(CatalogError::AddressConflict {
                        address: *address,
                        first: params[a].name.clone(),
                        second: params[b].name.clone()
                    });
                }
            }
        }
    }

    Ok(())
}

/// Resolve every slot's image field. Fields without an explicit location
/// are packed after the previous field in catalog order.
fn assign_fields(params: &[ParameterDefinition]) -> Result<Vec<Field>, CatalogError> {
    let mut cursor = 0;
    let mut fields = Vec::with_capacity(params.len());
    for p in params {
        let field = p.field.unwrap_or_else(|| Field::for_range(cursor, p.from, p.to));
        let fits = field.width <= 16 && field.end() <= DATA_BITS &&
            field.signed == (p.from < 0) &&
            Field::for_range(0, p.from, p.to).width <= field.width;
        if !fits {
            return Err(CatalogError::BadField(p.name.clone()));
        }
        cursor = cursor.max(field.end());
        fields.push(field);
    }

    let mut order = (0 .. fields.len()).collect::<Vec<_>>();
    order.sort_by_key(|&i| fields[i].offset);
    for pair in order.windows(2) {
        if fields[pair[0]].end() > fields[pair[1]].offset {
            return Err(CatalogError::BadField(params[pair[1]].name.clone()));
        }
    }

    Ok(fields)
}
