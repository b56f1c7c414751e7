//! Relation label classification
//!
//! Treebanks in the AGDT tradition encode two structurally special categories
//! directly in the relation label:
//!
//! - auxiliaries (`AuxP`, `AuxC`, `AuxX`, ...) are unary linkers that sit
//!   between a word and its syntactic head;
//! - coordination is marked by a coordinator token (`COORD`) whose coordinands
//!   carry the coordinated relation plus a suffix (`OBJ_CO`, `SBJ_CO`, ...).
//!
//! A [`LabelScheme`] knows the three markers and classifies a label into
//! independent [`Markers`]. A label carrying more than one marker is malformed;
//! classifying it never fails, but [`Category::Mixed`] flags it.

use thiserror::Error;

/// Marker configuration for relation labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelScheme {
    auxiliary: String,
    coordinator: String,
    coordinand_suffix: String,
}

/// Error for an unusable marker configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemeError {
    #[error("Label scheme error: {0} marker is empty")]
    EmptyMarker(&'static str),

    #[error("Label scheme error: markers {0:?} and {1:?} overlap")]
    OverlappingMarkers(String, String),
}

impl Default for LabelScheme {
    /// The Ancient Greek and Latin Dependency Treebank conventions
    fn default() -> Self {
        Self {
            auxiliary: "Aux".to_string(),
            coordinator: "COORD".to_string(),
            coordinand_suffix: "_CO".to_string(),
        }
    }
}

impl LabelScheme {
    /// Create a scheme from custom markers
    ///
    /// Markers must be non-empty and no marker may contain another, otherwise
    /// every label carrying one would also count as carrying the other.
    pub fn new(
        auxiliary: &str,
        coordinator: &str,
        coordinand_suffix: &str,
    ) -> Result<Self, SchemeError> {
        for (name, marker) in [
            ("auxiliary", auxiliary),
            ("coordinator", coordinator),
            ("coordinand", coordinand_suffix),
        ] {
            if marker.is_empty() {
                return Err(SchemeError::EmptyMarker(name));
            }
        }

        let markers = [auxiliary, coordinator, coordinand_suffix];
        for (i, a) in markers.iter().enumerate() {
            for b in &markers[i + 1..] {
                if a.contains(b) || b.contains(a) {
                    return Err(SchemeError::OverlappingMarkers(a.to_string(), b.to_string()));
                }
            }
        }

        Ok(Self {
            auxiliary: auxiliary.to_string(),
            coordinator: coordinator.to_string(),
            coordinand_suffix: coordinand_suffix.to_string(),
        })
    }

    pub fn auxiliary_marker(&self) -> &str {
        &self.auxiliary
    }

    pub fn coordinator_tag(&self) -> &str {
        &self.coordinator
    }

    pub fn coordinand_suffix(&self) -> &str {
        &self.coordinand_suffix
    }

    /// Which category markers occur anywhere in the label
    pub fn markers(&self, label: &str) -> Markers {
        Markers {
            auxiliary: label.contains(self.auxiliary.as_str()),
            coordinator: label.contains(self.coordinator.as_str()),
            coordinand: label.contains(self.coordinand_suffix.as_str()),
        }
    }

    pub fn is_auxiliary(&self, label: &str) -> bool {
        label.contains(self.auxiliary.as_str())
    }

    /// True only for the bare coordinator tag
    pub fn is_coordinator(&self, label: &str) -> bool {
        label == self.coordinator
    }

    /// True if the label reads "coordinand of `relation`"
    pub fn is_coordinand_of(&self, label: &str, relation: &str) -> bool {
        self.coordinand_base(label) == Some(relation)
    }

    /// The coordinated relation of a coordinand label: `OBJ` for `OBJ_CO`
    pub fn coordinand_base<'a>(&self, label: &'a str) -> Option<&'a str> {
        label
            .strip_suffix(self.coordinand_suffix.as_str())
            .filter(|base| !base.is_empty())
    }

    /// The coordinand label for a relation: `OBJ_CO` for `OBJ`
    pub fn coordinand_label(&self, relation: &str) -> String {
        format!("{}{}", relation, self.coordinand_suffix)
    }

    /// At most one category marker
    pub fn well_formed(&self, label: &str) -> bool {
        self.markers(label).count() <= 1
    }

    pub fn category(&self, label: &str) -> Category {
        self.markers(label).category()
    }
}

/// Category markers found in a label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Markers {
    pub auxiliary: bool,
    pub coordinator: bool,
    pub coordinand: bool,
}

impl Markers {
    pub fn count(self) -> usize {
        self.auxiliary as usize + self.coordinator as usize + self.coordinand as usize
    }

    pub fn category(self) -> Category {
        match (self.auxiliary, self.coordinator, self.coordinand) {
            (false, false, false) => Category::Plain,
            (true, false, false) => Category::Auxiliary,
            (false, true, false) => Category::Coordinator,
            (false, false, true) => Category::Coordinand,
            _ => Category::Mixed,
        }
    }
}

/// Structural category of a relation label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Plain,
    Auxiliary,
    Coordinator,
    Coordinand,
    /// More than one marker: malformed
    Mixed,
}
