use anyhow::Context;
use pgcore::recommendation::Calculation;
use pgcore::session::{InputField, PavementInputs};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// One-line record of an offline calculation.
pub fn format_report(inputs: &PavementInputs, calculation: &Calculation) -> String {
    let fields = InputField::ALL
        .iter()
        .map(|field| format!("{}={}", field.key(), inputs.get(*field)))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "grade=\"{}\" {} mode={}\n",
        calculation.summary.grade,
        fields,
        inputs.mode.key()
    )
}

pub fn append_report(path: &Path, line: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening report {}", path.display()))?;
    file.write_all(line.as_bytes())
        .with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgcore::recommendation::{calculate, FixedGradeRecommender};
    use pgcore::session::{Session, ViewState};
    use std::sync::Arc;

    #[test]
    fn report_line_lists_every_input() {
        let session = Session::start(ViewState::default(), Arc::default());
        let calc = calculate(&session, &FixedGradeRecommender::default());
        let line = format_report(session.inputs(), &calc);
        assert_eq!(
            line,
            "grade=\"PG 64-22\" rut_depth=12 esal=35 traffic_speed=40 layer_depth=70 \
             reliability=98 mode=nearest_station\n"
        );
    }

    #[test]
    fn append_report_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/offline.log");
        append_report(&path, "first\n").unwrap();
        append_report(&path, "second\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
