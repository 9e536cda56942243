use std::ops::RangeInclusive;
use crate::model::*;

pub struct ParamBuilder(ParameterDefinition);

impl ParamBuilder {
    pub fn new(name: &str) -> Self {
        let def = ParameterDefinition { name: name.into(), ..Default::default() };
        Self(def)
    }

    pub fn range(&mut self, from: i32, to: i32) -> &mut Self {
        self.0.from = from;
        self.0.to = to;
        self
    }

    pub fn default(&mut self, value: i32) -> &mut Self {
        self.0.default = value;
        self
    }

    pub fn nrpn(&mut self, address: u16) -> &mut Self {
        self.0.nrpn = Some(address);
        self
    }

    /// Discrete values, indexed from 0.
    pub fn values(&mut self, labels: &[&str]) -> &mut Self {
        for label in labels {
            self.item(label, None);
        }
        self
    }

    /// A discrete value sent as `nrpn_value` instead of its index.
    pub fn value_nrpn(&mut self, label: &str, nrpn_value: i32) -> &mut Self {
        self.item(label, Some(nrpn_value))
    }

    fn item(&mut self, label: &str, nrpn_value: Option<i32>) -> &mut Self {
        self.0.values.push(ListItem { label: label.into(), nrpn_value });
        self.0.from = 0;
        self.0.to = self.0.values.len() as i32 - 1;
        self
    }

    /// Pin the image field. Must follow `range`/`values`.
    pub fn at(&mut self, bit_offset: usize) -> &mut Self {
        let field = Field::for_range(bit_offset, self.0.from, self.0.to);
        self.0.field = Some(field);
        self
    }

    pub fn selector(&mut self, slots: RangeInclusive<u16>) -> &mut Self {
        self.0.role = Role::EffectSelector { slots };
        self
    }

    pub fn slot_of(&mut self, selector: &str, addresses: &[Option<u16>]) -> &mut Self {
        self.0.role = Role::EffectSlotParameter {
            selector: selector.into(),
            addresses: addresses.to_vec()
        };
        self
    }

    pub fn format(&mut self, format: Format) -> &mut Self {
        self.0.format = format;
        self
    }

    pub fn build(&self) -> ParameterDefinition {
        self.0.clone()
    }
}

impl Into<ParameterDefinition> for &mut ParamBuilder {
    fn into(self) -> ParameterDefinition {
        self.build()
    }
}

impl From<ParamBuilder> for ParameterDefinition {
    fn from(builder: ParamBuilder) -> Self {
        builder.0
    }
}

pub mod shorthand {
    use super::*;

    pub fn param(name: &str) -> ParamBuilder {
        ParamBuilder::new(name)
    }

    pub fn switch(name: &str) -> ParamBuilder {
        let mut b = ParamBuilder::new(name);
        b.values(&["off", "on"]);
        b
    }

    pub fn percent(name: &str) -> ParamBuilder {
        let mut b = ParamBuilder::new(name);
        b.range(0, 100).format(Format::Data(FormatData { k: 1.0, b: 0.0, format: "{val}%".into() }));
        b
    }

    pub fn bipolar(name: &str, limit: i32) -> ParamBuilder {
        let mut b = ParamBuilder::new(name);
        b.range(-limit, limit);
        b
    }
}

#[cfg(test)]
mod tests {
    use super::shorthand::*;
    use super::*;

    #[test]
    fn owned_and_borrowed_builders_convert() {
        let owned: ParameterDefinition = switch("sync").into();
        assert_eq!((owned.from, owned.to, owned.values.len()), (0, 1, 2));

        let borrowed: ParameterDefinition = bipolar("shape", 100).nrpn(9).into();
        assert_eq!(borrowed.range(), -100 ..= 100);
        assert_eq!(borrowed.nrpn, Some(9));

        let plain: ParameterDefinition = param("derived").into();
        assert_eq!(plain.nrpn, None);
        assert_eq!(plain.role, Role::Normal);
    }
}
