//! Printable text summary matching the paper clinical trial form.
//!
//! The layout, labels and blank lengths mirror the printed template line for
//! line, so empty fields still occupy the space the paper form gives them.

use crate::form::{FormData, InstrumentTable, PreOpTimingTable, Sex};

/// File name offered for the downloaded report.
pub const REPORT_FILE_NAME: &str = "Meril_Clinical_Trial_Summary.txt";

const TITLE: &str = "Clinical Trial Summary";
const BLANK: &str = "____________________________";
const LONG_BLANK: &str = "____________________________________________________________";
const CELL_BLANK: &str = "__________";
const SETTING_BLANK: &str = "_____";
const TELESCOPE_BLANK: &str = "[ ] 0°  [ ] 30°  _____ mm";
const INSTRUMENT_HEADER: &str = "   Type                           Uses";
const DIAGRAM_NOTE: &str = "   (See attached cart/port diagram)";

const TIMING_COLUMNS: [&str; 3] = ["Start Time", "End Time", "Total Time"];

/// Which paper form the report reproduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Cart position is sketched by hand in 25 ruled lines.
    #[default]
    Sketch,
    /// Cart position comes from the cart/port diagram, attached separately.
    Diagram,
}

/// Renders the form using the hand-sketch layout.
pub fn render(form: &FormData) -> String {
    render_with(form, Variant::Sketch)
}

pub fn render_with(form: &FormData, variant: Variant) -> String {
    let mut out = Report::default();

    out.line(TITLE);
    out.line("");

    out.line("Procedure & Date");
    out.line("Procedure:");
    out.line(&or_joined(&form.procedure, 3));
    out.line("");
    out.field("Date (dd-mm-yyyy): ", &form.date);
    out.field("Surgeon Name: ", &form.surgeon_name);
    out.field("Place: ", &form.place);
    out.line("");

    out.line("Patient Profile");
    out.field("Age: ", &form.age);
    out.line(match form.sex {
        Sex::Female => "Sex: [x] Female  [ ] Male",
        Sex::Male => "Sex: [ ] Female  [x] Male",
    });
    out.field("BMI: ", &form.bmi);
    out.line("Anatomical Challenges:");
    out.line(&or_joined(&form.anatomical_challenges, 2));
    out.line("");
    out.line("Previous Surgeries:");
    out.line(&or_joined(&form.previous_surgeries, 2));
    out.line("");

    out.line("Pre-Operative Time");
    out.line(&timing_table(&form.pre_op_timing));
    out.line("");

    out.line("Pre-Operative Steps:");
    out.line("1. Port Placement");
    out.field("   Location: ", &form.port_location);
    out.field("   Distance From Target: ", &form.distance_from_target);
    out.field("   Distance b/w Ports: ", &form.distance_between_ports);
    out.line("");
    out.line("2. Patient Position");
    out.line(&or_joined(&form.patient_position, 3));
    out.line("");
    out.line("3. Cart Position");
    out.field("   Height (Vertical Column): ", &form.cart_height);
    out.line("   Position w.r.t Port");
    match variant {
        Variant::Sketch => out.line(&or_stacked(&form.cart_position_wrt_port, 25)),
        Variant::Diagram => {
            out.line(DIAGRAM_NOTE);
            if !form.cart_position_wrt_port.is_empty() {
                out.line(&form.cart_position_wrt_port);
            }
            out.line("");
        }
    }
    out.line("4. Arm Position:");
    out.field("   Camera: ", &form.arm_camera);
    out.field("   R1: ", &form.arm_r1);
    out.field("   R2: ", &form.arm_r2);
    out.line("");

    out.line("Intra-Operative Time");
    out.field("Starting: ", &form.intra_starting);
    out.field("Suturing: ", &form.intra_suturing);
    out.field("Ending: ", &form.intra_ending);
    out.field("Total Duration: ", &form.intra_total_duration);
    out.line("Non-robotic Step:");
    out.line(&or_joined(&form.non_robotic_step, 2));
    out.line("Additional advanced (non-robotic) Instruments");
    out.line(&or_joined(&form.additional_instruments, 2));
    out.line("");

    out.line("System Settings");
    out.line("Right Arm Instrument");
    out.line(INSTRUMENT_HEADER);
    out.instruments(&form.right_arm);
    out.line("Left Arm Instrument");
    out.line(INSTRUMENT_HEADER);
    out.instruments(&form.left_arm);

    out.line("Visualization & Energy");
    out.field("Camera Name: ", &form.camera_name);
    out.line(&format!("Telescope: {}", telescope_line(form)));
    out.setting("ESU: Monopolar Cut     ", &form.esu_monopolar_cut, " W");
    out.setting("     Monopolar Coag    ", &form.esu_monopolar_coag, " W");
    out.setting("     Bipolar           ", &form.esu_bipolar, " W");
    out.setting("     Ligasure          ", &form.ligasure_level, " lvl");
    out.line("");

    out.line("Observations");
    out.line("Port Placement");
    out.block(&form.obs_port_placement, 6);
    out.line("Cart Placement");
    out.block(&form.obs_cart_placement, 6);
    out.line("Arm Collisions:");
    out.block(&form.obs_arm_collisions, 6);
    out.line("Camera Observation:");
    out.block(&form.obs_camera, 6);
    out.field("Insufflator: ", &form.insufflator);
    out.field("Smoke evacuator: ", &form.smoke_evacuator);
    out.line("System Observations:");
    out.block(&form.system_observations, 10);
    out.field("Total Blood Loss: ", &form.total_blood_loss);
    out.line("");

    out.line("Surgeon Feedback");
    out.line(&or_stacked(&form.surgeon_feedback, 12));
    out.line("");

    out.line("Recommended Actions:");
    out.push(&or_stacked(&form.recommended_actions, 15));

    out.finish()
}

#[derive(Default)]
struct Report {
    text: String,
}

impl Report {
    fn push(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn line(&mut self, text: &str) {
        self.push(text);
        self.text.push('\n');
    }

    fn finish(self) -> String {
        self.text
    }

    /// `label` followed by the value, or the short blank when empty.
    fn field(&mut self, label: &str, value: &str) {
        self.text.push_str(label);
        self.line(or_blank(value, BLANK));
    }

    fn setting(&mut self, label: &str, value: &str, unit: &str) {
        self.text.push_str(label);
        self.text.push_str(or_blank(value, SETTING_BLANK));
        self.line(unit);
    }

    /// Free text that is immediately followed by the next label. Text
    /// without a trailing newline gets one so the label starts its own line.
    fn block(&mut self, value: &str, blank_lines: usize) {
        if value.is_empty() {
            self.text.push_str(&stacked_blanks(blank_lines));
        } else {
            self.text.push_str(value);
            if !value.ends_with('\n') {
                self.text.push('\n');
            }
        }
    }

    fn instruments(&mut self, table: &InstrumentTable) {
        for row in table.rows() {
            self.line(&instrument_line(&row.kind, &row.uses));
        }
    }
}

fn or_blank<'a>(value: &'a str, blank: &'a str) -> &'a str {
    if value.is_empty() { blank } else { value }
}

/// `n` long blanks separated by newlines, with no trailing newline.
fn or_joined(value: &str, n: usize) -> String {
    if value.is_empty() {
        vec![LONG_BLANK; n].join("\n")
    } else {
        value.to_string()
    }
}

/// `n` long blanks, each terminated by a newline.
fn or_stacked(value: &str, n: usize) -> String {
    if value.is_empty() {
        stacked_blanks(n)
    } else {
        value.to_string()
    }
}

fn stacked_blanks(n: usize) -> String {
    format!("{LONG_BLANK}\n").repeat(n)
}

fn instrument_line(kind: &str, uses: &str) -> String {
    format!(
        "   {}     {}",
        or_blank(kind, CELL_BLANK),
        or_blank(uses, CELL_BLANK)
    )
}

fn telescope_line(form: &FormData) -> String {
    let mut parts = Vec::new();
    if form.telescope_0 {
        parts.push("0°".to_string());
    }
    if form.telescope_30 {
        parts.push("30°".to_string());
    }
    if !form.telescope_custom.trim().is_empty() {
        parts.push(format!("{}mm", form.telescope_custom));
    }

    if parts.is_empty() {
        TELESCOPE_BLANK.to_string()
    } else {
        format!("[x] {}", parts.join("  [x] "))
    }
}

/// Grid of the timing table: row labels left aligned, then the Start, End
/// and Total columns right aligned, two spaces apart. No trailing newline.
fn timing_table(table: &PreOpTimingTable) -> String {
    let label_width = table
        .iter()
        .map(|(step, _)| step.label().chars().count())
        .max()
        .unwrap_or(0);

    let cells: Vec<[&str; 3]> = table
        .iter()
        .map(|(_, row)| [row.start.as_str(), row.end.as_str(), row.total.as_str()])
        .collect();

    let mut widths = TIMING_COLUMNS.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(cells.len() + 1);
    let mut header = " ".repeat(label_width);
    for (title, width) in TIMING_COLUMNS.iter().zip(widths) {
        header.push_str(&format!("  {title:>width$}"));
    }
    lines.push(header);

    for ((step, _), row) in table.iter().zip(&cells) {
        let mut line = format!("{:<label_width$}", step.label());
        for (cell, width) in row.iter().zip(widths) {
            line.push_str(&format!("  {cell:>width$}"));
        }
        lines.push(line);
    }

    lines.join("\n")
}
