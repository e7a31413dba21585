/// Record model for the hotspot export: nine typed columns plus the raw line.
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Number of columns a complete source line carries.
pub const FIELD_COUNT: usize = 9;

/// The column a sort is keyed on. Closed: every variant maps to exactly one
/// column, so a comparison can never see an unknown key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    /// `id_bdq`
    Id,
    /// `foco_id`
    SecondaryId,
    /// `lat`
    Latitude,
    /// `lon`
    Longitude,
    /// `data_pas`
    Date,
    /// `pais`
    Country,
    /// `estado`
    Region1,
    /// `municipio`
    Region2,
    /// `bioma`
    Biome,
}

impl FieldKey {
    /// All keys in column (and menu) order.
    pub const ALL: [FieldKey; FIELD_COUNT] = [
        FieldKey::Id,
        FieldKey::SecondaryId,
        FieldKey::Latitude,
        FieldKey::Longitude,
        FieldKey::Date,
        FieldKey::Country,
        FieldKey::Region1,
        FieldKey::Region2,
        FieldKey::Biome,
    ];

    /// 0-based column position in the source line.
    #[inline]
    pub fn column(self) -> usize {
        match self {
            FieldKey::Id => 0,
            FieldKey::SecondaryId => 1,
            FieldKey::Latitude => 2,
            FieldKey::Longitude => 3,
            FieldKey::Date => 4,
            FieldKey::Country => 5,
            FieldKey::Region1 => 6,
            FieldKey::Region2 => 7,
            FieldKey::Biome => 8,
        }
    }

    /// Column name as it appears in the file header.
    pub fn name(self) -> &'static str {
        match self {
            FieldKey::Id => "id_bdq",
            FieldKey::SecondaryId => "foco_id",
            FieldKey::Latitude => "lat",
            FieldKey::Longitude => "lon",
            FieldKey::Date => "data_pas",
            FieldKey::Country => "pais",
            FieldKey::Region1 => "estado",
            FieldKey::Region2 => "municipio",
            FieldKey::Biome => "bioma",
        }
    }

    /// Menu label shown by the interactive prompt.
    pub fn label(self) -> &'static str {
        match self {
            FieldKey::Latitude => "lat (latitude)",
            FieldKey::Longitude => "lon (longitude)",
            FieldKey::Date => "data_pas (pass date)",
            other => other.name(),
        }
    }

    /// 1-based menu number (1..=9).
    #[inline]
    pub fn menu_index(self) -> usize {
        self.column() + 1
    }

    /// Map a 1-based menu choice back to a key. Anything outside 1..=9 is None.
    pub fn from_menu_index(n: usize) -> Option<FieldKey> {
        n.checked_sub(1).and_then(|i| FieldKey::ALL.get(i).copied())
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKey {
    type Err = Error;

    /// Accepts the header name, an English alias, or the menu number.
    fn from_str(s: &str) -> Result<FieldKey, Error> {
        let t = s.trim();
        if let Ok(n) = t.parse::<usize>() {
            return FieldKey::from_menu_index(n).ok_or_else(|| Error::InvalidField(s.to_string()));
        }
        let key = match t.to_ascii_lowercase().as_str() {
            "id_bdq" | "id" => FieldKey::Id,
            "foco_id" | "secondary-id" | "secondary_id" => FieldKey::SecondaryId,
            "lat" | "latitude" => FieldKey::Latitude,
            "lon" | "longitude" => FieldKey::Longitude,
            "data_pas" | "date" => FieldKey::Date,
            "pais" | "country" => FieldKey::Country,
            "estado" | "state" | "region1" => FieldKey::Region1,
            "municipio" | "municipality" | "region2" => FieldKey::Region2,
            "bioma" | "biome" => FieldKey::Biome,
            _ => return Err(Error::InvalidField(s.to_string())),
        };
        Ok(key)
    }
}

/// One parsed data line.
///
/// Text columns are kept as trimmed byte spans into the retained source line,
/// so cloning a record (what the merge counts as a movement) copies one
/// buffer instead of nine. Coordinates are parsed once up front.
/// `Default` is an empty placeholder left behind when a record is moved out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    line: Box<[u8]>,
    spans: [(usize, usize); FIELD_COUNT],
    lat: f64,
    lon: f64,
    field_count: usize,
}

impl Record {
    pub(crate) fn from_parts(
        line: Box<[u8]>,
        spans: [(usize, usize); FIELD_COUNT],
        lat: f64,
        lon: f64,
        field_count: usize,
    ) -> Record {
        Record {
            line,
            spans,
            lat,
            lon,
            field_count,
        }
    }

    /// The trimmed text of a column. Missing columns are empty.
    #[inline]
    pub fn field(&self, key: FieldKey) -> &[u8] {
        let (s, e) = self.spans[key.column()];
        &self.line[s..e]
    }

    #[inline]
    pub fn id(&self) -> &[u8] {
        self.field(FieldKey::Id)
    }

    #[inline]
    pub fn secondary_id(&self) -> &[u8] {
        self.field(FieldKey::SecondaryId)
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    #[inline]
    pub fn date(&self) -> &[u8] {
        self.field(FieldKey::Date)
    }

    #[inline]
    pub fn country(&self) -> &[u8] {
        self.field(FieldKey::Country)
    }

    #[inline]
    pub fn region1(&self) -> &[u8] {
        self.field(FieldKey::Region1)
    }

    #[inline]
    pub fn region2(&self) -> &[u8] {
        self.field(FieldKey::Region2)
    }

    #[inline]
    pub fn biome(&self) -> &[u8] {
        self.field(FieldKey::Biome)
    }

    /// The source line exactly as read (without its line terminator).
    #[inline]
    pub fn raw(&self) -> &[u8] {
        &self.line
    }

    /// How many comma-separated columns the source line carried, capped at nine.
    #[inline]
    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// True when every column was present in the source line.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.field_count == FIELD_COUNT
    }
}
