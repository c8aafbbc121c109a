use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

/// The eight physiological measurements collected by the assessment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeasurementField {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

/// Static description of how a field is named on the wire and shown on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field: MeasurementField,
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
}

/// Display and wire order of the assessment form.
pub const FIELD_DESCRIPTORS: [FieldDescriptor; 8] = [
    FieldDescriptor {
        field: MeasurementField::Pregnancies,
        name: "pregnancies",
        label: "Pregnancies",
        placeholder: "Enter pregnancies",
    },
    FieldDescriptor {
        field: MeasurementField::Glucose,
        name: "glucose",
        label: "Glucose",
        placeholder: "Enter glucose",
    },
    FieldDescriptor {
        field: MeasurementField::BloodPressure,
        name: "bloodPressure",
        label: "Blood Pressure",
        placeholder: "Enter blood pressure",
    },
    FieldDescriptor {
        field: MeasurementField::SkinThickness,
        name: "skinThickness",
        label: "Skin Thickness",
        placeholder: "Enter skin thickness",
    },
    FieldDescriptor {
        field: MeasurementField::Insulin,
        name: "insulin",
        label: "Insulin",
        placeholder: "Enter insulin",
    },
    FieldDescriptor {
        field: MeasurementField::Bmi,
        name: "bmi",
        label: "BMI",
        placeholder: "Enter bmi",
    },
    FieldDescriptor {
        field: MeasurementField::DiabetesPedigreeFunction,
        name: "diabetesPedigreeFunction",
        label: "Diabetes Pedigree Function",
        placeholder: "Enter diabetes pedigree function",
    },
    FieldDescriptor {
        field: MeasurementField::Age,
        name: "age",
        label: "Age",
        placeholder: "Enter age",
    },
];

impl MeasurementField {
    pub const ALL: [Self; 8] = [
        Self::Pregnancies,
        Self::Glucose,
        Self::BloodPressure,
        Self::SkinThickness,
        Self::Insulin,
        Self::Bmi,
        Self::DiabetesPedigreeFunction,
        Self::Age,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn descriptor(self) -> &'static FieldDescriptor {
        &FIELD_DESCRIPTORS[self.index()]
    }

    /// Key used in the prediction request body and in form posts.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }

    /// Exact, case-sensitive lookup of a wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        FIELD_DESCRIPTORS
            .iter()
            .find(|descriptor| descriptor.name == name)
            .map(|descriptor| descriptor.field)
    }
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw, unvalidated text for every measurement field.
///
/// Serializes as a JSON object whose keys are the eight wire names in form
/// order and whose values are the strings exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: [String; 8],
}

impl FieldSet {
    pub fn get(&self, field: MeasurementField) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: MeasurementField, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeasurementField, &str)> + '_ {
        MeasurementField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }

    /// Fields that would fail the required-value contract of the form.
    ///
    /// Whitespace-only text counts as empty, matching what a numeric input
    /// reports for it.
    pub fn missing_fields(&self) -> Vec<MeasurementField> {
        self.iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

impl Serialize for FieldSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.name(), value)?;
        }
        map.end()
    }
}

/// Returned when a form post names a field the assessment does not collect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown assessment field '{0}'")]
pub struct UnknownField(pub String);

/// Editable form state backing the assessment page.
#[derive(Debug, Clone, Default)]
pub struct AssessmentForm {
    fields: FieldSet,
}

impl AssessmentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: MeasurementField, value: impl Into<String>) {
        let value = value.into();
        debug!(field = field.name(), len = value.len(), "assessment field updated");
        self.fields.set(field, value);
    }

    pub fn set_field_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<MeasurementField, UnknownField> {
        let field = MeasurementField::from_name(name).ok_or_else(|| UnknownField(name.into()))?;
        self.set_field(field, value);
        Ok(field)
    }

    pub fn value(&self, field: MeasurementField) -> &str {
        self.fields.get(field)
    }

    /// Copy of the current values, taken once per submission attempt.
    pub fn snapshot(&self) -> FieldSet {
        self.fields.clone()
    }
}
