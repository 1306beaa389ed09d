use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Patient sex as captured on the paper form. Exactly one box is ticked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    #[serde(alias = "female", alias = "F")]
    Female,
    #[serde(alias = "male", alias = "M")]
    Male,
}

/// Rows of the pre-operative timing table, in print order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingStep {
    SystemSetup,
    DrapingTime,
    AnesthesiaTime,
    PortPlacement,
    DockingTime,
}

impl TimingStep {
    pub const ALL: [TimingStep; 5] = [
        TimingStep::SystemSetup,
        TimingStep::DrapingTime,
        TimingStep::AnesthesiaTime,
        TimingStep::PortPlacement,
        TimingStep::DockingTime,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimingStep::SystemSetup => "System Setup",
            TimingStep::DrapingTime => "Draping Time",
            TimingStep::AnesthesiaTime => "Anesthesia Time",
            TimingStep::PortPlacement => "Port Placement",
            TimingStep::DockingTime => "Docking Time",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|step| step.label().eq_ignore_ascii_case(wanted))
    }
}

/// One row of the timing table. Times are free text, never parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingRow {
    pub start: String,
    pub end: String,
    pub total: String,
}

/// Wire shape of a timing row in form files. `label` is optional; rows
/// without one fill the table positionally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub start: String,
    pub end: String,
    pub total: String,
}

/// The five-row pre-operative timing table. Rows never grow or shrink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TimingEntry>", into = "Vec<TimingEntry>")]
pub struct PreOpTimingTable {
    rows: [TimingRow; 5],
}

impl PreOpTimingTable {
    pub fn row(&self, step: TimingStep) -> &TimingRow {
        &self.rows[step as usize]
    }

    pub fn row_mut(&mut self, step: TimingStep) -> &mut TimingRow {
        &mut self.rows[step as usize]
    }

    /// Rows paired with their step, in print order.
    pub fn iter(&self) -> impl Iterator<Item = (TimingStep, &TimingRow)> {
        TimingStep::ALL.into_iter().zip(self.rows.iter())
    }
}

impl TryFrom<Vec<TimingEntry>> for PreOpTimingTable {
    type Error = String;

    fn try_from(entries: Vec<TimingEntry>) -> Result<Self, Self::Error> {
        let mut table = PreOpTimingTable::default();
        for (position, entry) in entries.into_iter().enumerate() {
            let step = match entry.label.as_deref() {
                Some(label) => TimingStep::from_label(label).ok_or_else(|| {
                    format!(
                        "unknown pre-operative timing row '{}' (expected one of: {})",
                        label,
                        TimingStep::ALL.map(TimingStep::label).join(", ")
                    )
                })?,
                None => match TimingStep::ALL.get(position) {
                    Some(step) => *step,
                    None => {
                        crate::log::warn!(position, "dropping extra pre-operative timing row");
                        continue;
                    }
                },
            };
            *table.row_mut(step) = TimingRow {
                start: entry.start,
                end: entry.end,
                total: entry.total,
            };
        }
        Ok(table)
    }
}

impl From<PreOpTimingTable> for Vec<TimingEntry> {
    fn from(table: PreOpTimingTable) -> Self {
        TimingStep::ALL
            .into_iter()
            .zip(table.rows)
            .map(|(step, row)| TimingEntry {
                label: Some(step.label().to_string()),
                start: row.start,
                end: row.end,
                total: row.total,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentRow {
    #[serde(rename = "type")]
    pub kind: String,
    pub uses: String,
}

impl InstrumentRow {
    pub fn new(kind: impl Into<String>, uses: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            uses: uses.into(),
        }
    }
}

/// Instruments mounted on one robotic arm: always three rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<InstrumentRow>", into = "Vec<InstrumentRow>")]
pub struct InstrumentTable {
    rows: [InstrumentRow; 3],
}

impl InstrumentTable {
    pub fn rows(&self) -> &[InstrumentRow; 3] {
        &self.rows
    }

    /// Panics if `index` is not 0, 1 or 2.
    pub fn row_mut(&mut self, index: usize) -> &mut InstrumentRow {
        &mut self.rows[index]
    }
}

impl From<Vec<InstrumentRow>> for InstrumentTable {
    fn from(rows: Vec<InstrumentRow>) -> Self {
        if rows.len() > 3 {
            crate::log::warn!(rows = rows.len(), "instrument table holds 3 rows, extra rows dropped");
        }
        let mut table = InstrumentTable::default();
        for (slot, row) in table.rows.iter_mut().zip(rows) {
            *slot = row;
        }
        table
    }
}

impl From<InstrumentTable> for Vec<InstrumentRow> {
    fn from(table: InstrumentTable) -> Self {
        table.rows.into()
    }
}

/// Everything the intake form collects for one procedure.
///
/// All text fields are optional in form files and default to empty; the
/// report substitutes a blank for each empty one. Unknown keys are rejected
/// so a misspelled field cannot silently print as a blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormData {
    // Procedure & Date
    pub procedure: String,
    pub date: String,
    pub surgeon_name: String,
    pub place: String,

    // Patient Profile
    pub age: String,
    pub sex: Sex,
    pub bmi: String,
    pub anatomical_challenges: String,
    pub previous_surgeries: String,

    // Pre-Operative Steps
    pub port_location: String,
    pub distance_from_target: String,
    pub distance_between_ports: String,
    pub patient_position: String,
    pub cart_height: String,
    pub cart_position_wrt_port: String,
    pub arm_camera: String,
    pub arm_r1: String,
    pub arm_r2: String,

    // Intra-Operative Time
    pub intra_starting: String,
    pub intra_suturing: String,
    pub intra_ending: String,
    pub intra_total_duration: String,
    pub non_robotic_step: String,
    pub additional_instruments: String,

    // Visualization & Energy
    pub camera_name: String,
    pub telescope_0: bool,
    pub telescope_30: bool,
    pub telescope_custom: String,
    pub esu_monopolar_cut: String,
    pub esu_monopolar_coag: String,
    pub esu_bipolar: String,
    pub ligasure_level: String,

    // Observations
    pub obs_port_placement: String,
    pub obs_cart_placement: String,
    pub obs_arm_collisions: String,
    pub obs_camera: String,
    pub insufflator: String,
    pub smoke_evacuator: String,
    pub system_observations: String,
    pub total_blood_loss: String,

    pub surgeon_feedback: String,
    pub recommended_actions: String,

    // Tables stay last: TOML writes them as [[...]] sections after the keys.
    pub pre_op_timing: PreOpTimingTable,
    pub right_arm: InstrumentTable,
    pub left_arm: InstrumentTable,
}

/// Serialization formats accepted for form files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFormat {
    Toml,
    Yaml,
    Json,
}

impl FormFormat {
    /// Picks the format from a file extension, if it names one.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(FormFormat::Toml),
            "yaml" | "yml" => Some(FormFormat::Yaml),
            "json" => Some(FormFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for FormFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormFormat::Toml => "TOML",
            FormFormat::Yaml => "YAML",
            FormFormat::Json => "JSON",
        })
    }
}

impl FormData {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::FormParse {
            format: FormFormat::Toml,
            message: e.to_string(),
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::FormParse {
            format: FormFormat::Yaml,
            message: e.to_string(),
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::FormParse {
            format: FormFormat::Json,
            message: e.to_string(),
        })
    }

    pub fn parse(content: &str, format: FormFormat) -> Result<Self> {
        match format {
            FormFormat::Toml => Self::from_toml(content),
            FormFormat::Yaml => Self::from_yaml(content),
            FormFormat::Json => Self::from_json(content),
        }
    }

    /// Parses a form whose format is unknown. The format is the first of
    /// TOML, YAML or JSON whose syntax accepts the content as a table or
    /// mapping; that format's error is reported, so field errors such as an
    /// unknown timing row are not hidden behind another format's syntax
    /// error. Content no format accepts reports the TOML error.
    pub fn parse_any(content: &str) -> Result<Self> {
        let format = if toml::from_str::<toml::Table>(content).is_ok() {
            FormFormat::Toml
        } else if serde_yaml::from_str::<serde_yaml::Value>(content)
            .is_ok_and(|value| value.is_mapping())
        {
            FormFormat::Yaml
        } else if serde_json::from_str::<serde_json::Value>(content)
            .is_ok_and(|value| value.is_object())
        {
            FormFormat::Json
        } else {
            FormFormat::Toml
        };
        crate::log::debug!(%format, "detected form format");
        Self::parse(content, format)
    }

    /// Loads a form file, using its extension to pick the format.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        crate::log::debug!(path = %path.display(), "loading form");

        match FormFormat::from_path(path) {
            Some(format) => Self::parse(&content, format),
            None => Self::parse_any(&content),
        }
    }

    pub fn to_format(&self, format: FormFormat) -> Result<String> {
        let serialized = match format {
            FormFormat::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
            FormFormat::Yaml => serde_yaml::to_string(self).map_err(|e| e.to_string()),
            FormFormat::Json => serde_json::to_string_pretty(self).map_err(|e| e.to_string()),
        };
        serialized.map_err(|message| Error::FormSerialize { format, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_rows_match_by_label_in_any_order() {
        let form = FormData::from_toml(
            r#"
[[pre_op_timing]]
label = "docking time"
start = "09:10"
end = "09:25"
total = "15 min"

[[pre_op_timing]]
label = "System Setup"
start = "08:00"
"#,
        )
        .expect("valid form");

        let docking = form.pre_op_timing.row(TimingStep::DockingTime);
        assert_eq!(docking.start, "09:10");
        assert_eq!(docking.total, "15 min");
        assert_eq!(form.pre_op_timing.row(TimingStep::SystemSetup).start, "08:00");
        assert_eq!(form.pre_op_timing.row(TimingStep::DrapingTime), &TimingRow::default());
    }

    #[test]
    fn unlabelled_timing_rows_fill_positionally() {
        let form = FormData::from_json(
            r#"{"pre_op_timing": [{"start": "a"}, {"start": "b"}, {}, {}, {}, {"start": "extra"}]}"#,
        )
        .expect("valid form");

        let starts: Vec<_> = form.pre_op_timing.iter().map(|(_, row)| row.start.as_str()).collect();
        assert_eq!(starts, ["a", "b", "", "", ""]);
    }

    #[test]
    fn unknown_timing_label_is_rejected() {
        let err = FormData::from_yaml("pre_op_timing:\n  - label: Coffee Break\n").unwrap_err();
        assert!(err.to_string().contains("Coffee Break"), "{err}");
    }

    #[test]
    fn instrument_tables_always_hold_three_rows() {
        let form = FormData::from_yaml(
            r#"
right_arm:
  - type: Maryland
    uses: Dissection
left_arm:
  - {type: a}
  - {type: b}
  - {type: c}
  - {type: d}
"#,
        )
        .expect("valid form");

        assert_eq!(form.right_arm.rows()[0], InstrumentRow::new("Maryland", "Dissection"));
        assert_eq!(form.right_arm.rows()[2], InstrumentRow::default());
        let kinds: Vec<_> = form.left_arm.rows().iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(kinds, ["a", "b", "c"]);
    }

    #[test]
    fn sex_accepts_lowercase_and_defaults_to_female() {
        assert_eq!(FormData::default().sex, Sex::Female);
        let form = FormData::from_toml("sex = \"male\"").expect("valid form");
        assert_eq!(form.sex, Sex::Male);
    }

    #[test]
    fn parse_any_falls_back_to_yaml_and_json() {
        let yaml = FormData::parse_any("surgeon_name: Dr. Rao\n").expect("yaml");
        assert_eq!(yaml.surgeon_name, "Dr. Rao");
        let json = FormData::parse_any(r#"{"telescope_30": true}"#).expect("json");
        assert!(json.telescope_30);
    }

    #[test]
    fn parse_any_reports_field_errors_from_the_detected_format() {
        let yaml = "surgeon_name: Dr. Rao\npre_op_timing:\n  - label: Coffee Break\n";
        let err = FormData::parse_any(yaml).unwrap_err();
        assert!(matches!(err, Error::FormParse { format: FormFormat::Yaml, .. }), "{err}");
        assert!(err.to_string().contains("Coffee Break"), "{err}");

        let err = FormData::parse_any(r#"{"pre_op_timing": [{"label": "Lunch"}]}"#).unwrap_err();
        assert!(err.to_string().contains("Lunch"), "{err}");
    }

    #[test]
    fn parse_any_keeps_toml_error_for_broken_toml() {
        let err = FormData::parse_any("surgeon_name = ").unwrap_err();
        assert!(matches!(err, Error::FormParse { format: FormFormat::Toml, .. }), "{err}");
    }

    #[test]
    fn misspelled_keys_are_rejected() {
        let err = FormData::from_toml("surgeon = \"Dr. Rao\"").unwrap_err();
        assert!(err.to_string().contains("surgeon"), "{err}");
        let err = FormData::parse_any("surgeon: Dr. Rao\n").unwrap_err();
        assert!(matches!(err, Error::FormParse { format: FormFormat::Yaml, .. }), "{err}");
    }

    #[test]
    fn template_survives_every_format() {
        let mut form = FormData::default();
        form.procedure = "Robotic hysterectomy".to_string();
        form.pre_op_timing.row_mut(TimingStep::AnesthesiaTime).end = "08:40".to_string();
        *form.left_arm.row_mut(1) = InstrumentRow::new("Needle driver", "Suturing");

        for format in [FormFormat::Toml, FormFormat::Yaml, FormFormat::Json] {
            let text = form.to_format(format).expect("serializes");
            assert_eq!(FormData::parse(&text, format).expect("parses"), form, "{format}");
        }
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(FormFormat::from_path(Path::new("case.YML")), Some(FormFormat::Yaml));
        assert_eq!(FormFormat::from_path(Path::new("case.json")), Some(FormFormat::Json));
        assert_eq!(FormFormat::from_path(Path::new("case.txt")), None);
    }
}
