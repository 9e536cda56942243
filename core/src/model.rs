use std::collections::HashMap;
use std::ops::RangeInclusive;
use strfmt::strfmt;

/// Location of a parameter value inside the image data bit stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub offset: usize,
    pub width: usize,
    pub signed: bool,
}

impl Field {
    pub fn end(&self) -> usize {
        self.offset + self.width
    }

    /// Narrowest field able to hold every value in `from ..= to`.
    pub fn for_range(offset: usize, from: i32, to: i32) -> Self {
        let signed = from < 0;
        let magnitude = if signed {
            ((-(from as i64)) - 1).max(to as i64) as u64
        } else {
            to as u64
        };
        let bits = (u64::BITS - magnitude.leading_zeros()) as usize;
        let width = (bits + signed as usize).max(1);

        Field { offset, width, signed }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListItem {
    pub label: String,
    /// Literal NRPN value sent instead of the item index.
    pub nrpn_value: Option<i32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Role {
    #[default]
    Normal,
    /// Chooses the effect occupying a slot. `slots` is the range of
    /// logical NRPN addresses of the slot parameters it owns.
    EffectSelector { slots: RangeInclusive<u16> },
    /// A slot parameter whose wire address depends on the value of the
    /// named selector: `addresses[n]` is the logical address used while the
    /// selector holds its n-th value; `None` means the current effect does
    /// not use this parameter.
    EffectSlotParameter { selector: String, addresses: Vec<Option<u16>> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormatData {
    pub k: f64,
    pub b: f64,
    pub format: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Format {
    #[default]
    Raw,
    Data(FormatData),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParameterDefinition {
    pub name: String,
    pub from: i32,
    pub to: i32,
    pub default: i32,
    pub values: Vec<ListItem>,
    pub nrpn: Option<u16>,
    pub role: Role,
    /// Explicit image location; assigned in catalog order when absent.
    pub field: Option<Field>,
    pub format: Format,
}

impl Default for ParameterDefinition {
    fn default() -> Self {
        ParameterDefinition {
            name: String::new(),
            from: 0,
            to: 127,
            default: 0,
            values: vec![],
            nrpn: None,
            role: Role::Normal,
            field: None,
            format: Format::Raw,
        }
    }
}

impl ParameterDefinition {
    pub fn range(&self) -> RangeInclusive<i32> {
        self.from ..= self.to
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.from, self.to)
    }

    pub fn steps(&self) -> i32 {
        self.to - self.from
    }

    pub fn is_selector(&self) -> bool {
        matches!(self.role, Role::EffectSelector { .. })
    }

    pub fn label(&self, value: i32) -> Option<&str> {
        let idx = usize::try_from(value - self.from).ok()?;
        self.values.get(idx).map(|item| item.label.as_str())
    }

    /// Value carried on the wire for `value`: the list override when the
    /// selected item has one, the value itself otherwise.
    pub fn nrpn_value(&self, value: i32) -> i32 {
        usize::try_from(value - self.from).ok()
            .and_then(|idx| self.values.get(idx))
            .and_then(|item| item.nrpn_value)
            .unwrap_or(value)
    }

    pub fn display(&self, value: i32) -> String {
        if let Some(label) = self.label(value) {
            return label.to_string();
        }
        match &self.format {
            Format::Raw => value.to_string(),
            Format::Data(FormatData { k, b, format }) => {
                let vars = HashMap::from([("val".to_string(), k * value as f64 + b)]);
                strfmt(format, &vars).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// Device description: identity and the ordered parameter list.
#[derive(Clone, Debug)]
pub struct Config {
    pub name: String,
    /// Product byte following the manufacturer id in program dumps.
    pub product: u8,
    /// Default MIDI channel, 0-based.
    pub channel: u8,
    pub params: Vec<ParameterDefinition>,
}
