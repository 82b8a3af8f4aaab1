//! Answer-file writer.

use std::io::Write;

use tf_core::AnswerRecord;

use crate::IoResult;

/// Write answer records in the tuple-file shape:
///
/// ```text
/// #(carId,StartTime,RoadID...)
/// (10001, 1, 5001, 5012)
/// ```
pub fn write_answers<W: Write>(mut writer: W, answers: &[AnswerRecord]) -> IoResult<()> {
    writeln!(writer, "#(carId,StartTime,RoadID...)")?;
    for ans in answers {
        write!(writer, "({}, {}", ans.car_id, ans.start_tick)?;
        for road in &ans.roads {
            write!(writer, ", {road}")?;
        }
        writeln!(writer, ")")?;
    }
    Ok(())
}
