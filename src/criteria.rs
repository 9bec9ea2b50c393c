use crate::error::CriteriaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Snapshot of the search form.
///
/// Text inputs keep exactly what the user typed; numbers are only parsed when a
/// search runs (see `filter::CriteriaBounds`). An empty string means "no
/// constraint".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub location: String,
    pub property_type: String,
    pub rooms: String,
    pub min_price: String,
    pub max_price: String,
    pub min_surface: String,
    pub max_surface: String,
    pub charges: String,
    pub bedrooms: String,
    pub floor: String,
    pub furnished: bool,
    pub balcony: bool,
    pub parking: bool,
    pub pets: bool,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            location: String::new(),
            property_type: "appartement".to_string(),
            rooms: String::new(),
            min_price: String::new(),
            max_price: String::new(),
            min_surface: String::new(),
            max_surface: String::new(),
            charges: "excluded".to_string(),
            bedrooms: String::new(),
            floor: String::new(),
            furnished: false,
            balcony: false,
            parking: false,
            pets: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriteriaField {
    Location,
    PropertyType,
    Rooms,
    MinPrice,
    MaxPrice,
    MinSurface,
    MaxSurface,
    Charges,
    Bedrooms,
    Floor,
    Furnished,
    Balcony,
    Parking,
    Pets,
}

impl CriteriaField {
    pub const ALL: [CriteriaField; 14] = [
        CriteriaField::Location,
        CriteriaField::PropertyType,
        CriteriaField::Rooms,
        CriteriaField::MinPrice,
        CriteriaField::MaxPrice,
        CriteriaField::MinSurface,
        CriteriaField::MaxSurface,
        CriteriaField::Charges,
        CriteriaField::Bedrooms,
        CriteriaField::Floor,
        CriteriaField::Furnished,
        CriteriaField::Balcony,
        CriteriaField::Parking,
        CriteriaField::Pets,
    ];

    /// Name used by the search form.
    pub fn form_name(&self) -> &'static str {
        match self {
            CriteriaField::Location => "location",
            CriteriaField::PropertyType => "propertyType",
            CriteriaField::Rooms => "rooms",
            CriteriaField::MinPrice => "minPrice",
            CriteriaField::MaxPrice => "maxPrice",
            CriteriaField::MinSurface => "minSurface",
            CriteriaField::MaxSurface => "maxSurface",
            CriteriaField::Charges => "charges",
            CriteriaField::Bedrooms => "bedrooms",
            CriteriaField::Floor => "floor",
            CriteriaField::Furnished => "furnished",
            CriteriaField::Balcony => "balcony",
            CriteriaField::Parking => "parking",
            CriteriaField::Pets => "pets",
        }
    }

    /// Whether the field is backed by a checkbox.
    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            CriteriaField::Furnished
                | CriteriaField::Balcony
                | CriteriaField::Parking
                | CriteriaField::Pets
        )
    }
}

impl fmt::Display for CriteriaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_name())
    }
}

impl FromStr for CriteriaField {
    type Err = CriteriaError;

    /// Accepts both the form's camelCase names and snake_case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        CriteriaField::ALL
            .iter()
            .copied()
            .find(|field| field.form_name().to_lowercase() == normalized)
            .ok_or_else(|| CriteriaError::UnknownField(s.to_string()))
    }
}

/// Raw value coming from a form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl SearchCriteria {
    /// Returns a new snapshot with `field` replaced and every other field untouched.
    ///
    /// Text is stored verbatim, out-of-range or non-numeric input included; the
    /// only check is that checkbox fields receive a flag and text fields receive text.
    pub fn update_field(
        &self,
        field: CriteriaField,
        value: impl Into<FieldValue>,
    ) -> Result<SearchCriteria, CriteriaError> {
        let mut next = self.clone();

        match (field.is_flag(), value.into()) {
            (true, FieldValue::Flag(flag)) => *next.flag_mut(field) = flag,
            (false, FieldValue::Text(text)) => *next.text_mut(field) = text,
            (true, FieldValue::Text(_)) => return Err(CriteriaError::ExpectedFlag(field)),
            (false, FieldValue::Flag(_)) => return Err(CriteriaError::ExpectedText(field)),
        }

        Ok(next)
    }

    fn text_mut(&mut self, field: CriteriaField) -> &mut String {
        match field {
            CriteriaField::Location => &mut self.location,
            CriteriaField::PropertyType => &mut self.property_type,
            CriteriaField::Rooms => &mut self.rooms,
            CriteriaField::MinPrice => &mut self.min_price,
            CriteriaField::MaxPrice => &mut self.max_price,
            CriteriaField::MinSurface => &mut self.min_surface,
            CriteriaField::MaxSurface => &mut self.max_surface,
            CriteriaField::Charges => &mut self.charges,
            CriteriaField::Bedrooms => &mut self.bedrooms,
            CriteriaField::Floor => &mut self.floor,
            CriteriaField::Furnished
            | CriteriaField::Balcony
            | CriteriaField::Parking
            | CriteriaField::Pets => unreachable!("checkbox fields hold flags"),
        }
    }

    fn flag_mut(&mut self, field: CriteriaField) -> &mut bool {
        match field {
            CriteriaField::Furnished => &mut self.furnished,
            CriteriaField::Balcony => &mut self.balcony,
            CriteriaField::Parking => &mut self.parking,
            CriteriaField::Pets => &mut self.pets,
            _ => unreachable!("text fields hold strings"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_field_replaces_only_that_field() {
        let before = SearchCriteria::default();
        let after = before.update_field(CriteriaField::MaxPrice, "1500").unwrap();

        assert_eq!(after.max_price, "1500");
        assert_eq!(before.max_price, "");
        assert_eq!(
            after,
            SearchCriteria {
                max_price: "1500".to_string(),
                ..SearchCriteria::default()
            }
        );
    }

    #[test]
    fn test_update_field_keeps_raw_text() {
        let criteria = SearchCriteria::default()
            .update_field(CriteriaField::Rooms, " deux ")
            .unwrap()
            .update_field(CriteriaField::MinSurface, "-5")
            .unwrap();

        assert_eq!(criteria.rooms, " deux ");
        assert_eq!(criteria.min_surface, "-5");
    }

    #[test]
    fn test_update_field_stores_flags() {
        let criteria = SearchCriteria::default()
            .update_field(CriteriaField::Balcony, true)
            .unwrap();
        assert!(criteria.balcony);

        let criteria = criteria.update_field(CriteriaField::Balcony, false).unwrap();
        assert!(!criteria.balcony);
    }

    #[test]
    fn test_update_field_rejects_mismatched_control() {
        let criteria = SearchCriteria::default();
        assert_eq!(
            criteria.update_field(CriteriaField::Pets, "yes"),
            Err(CriteriaError::ExpectedFlag(CriteriaField::Pets))
        );
        assert_eq!(
            criteria.update_field(CriteriaField::Location, true),
            Err(CriteriaError::ExpectedText(CriteriaField::Location))
        );
    }

    #[test]
    fn test_field_names_accept_form_and_snake_case() {
        assert_eq!("minPrice".parse::<CriteriaField>().unwrap(), CriteriaField::MinPrice);
        assert_eq!("min_price".parse::<CriteriaField>().unwrap(), CriteriaField::MinPrice);
        assert_eq!("property-type".parse::<CriteriaField>().unwrap(), CriteriaField::PropertyType);
        assert!(matches!(
            "garden".parse::<CriteriaField>(),
            Err(CriteriaError::UnknownField(_))
        ));
    }

    #[test]
    fn test_defaults_match_form() {
        let criteria = SearchCriteria::default();
        assert_eq!(criteria.property_type, "appartement");
        assert_eq!(criteria.charges, "excluded");
        assert!(!criteria.furnished && !criteria.balcony && !criteria.parking && !criteria.pets);
        assert_eq!(CriteriaField::ALL.iter().filter(|f| f.is_flag()).count(), 4);
    }
}
