//! Tuple-file readers.
//!
//! All readers accept any `Read` source, so tests can feed them
//! `std::io::Cursor`s and applications can stream from files or sockets.

use std::io::Read;

use tf_core::{AnswerRecord, CarRecord, CrossRecord, RoadRecord};

use crate::{IoError, IoResult};

// ── Row extraction ────────────────────────────────────────────────────────────

/// One parsed tuple with its 1-based source line number.
struct Row {
    line: usize,
    fields: Vec<i64>,
}

/// Strip the `#(…)` header and the per-line parentheses, then parse the
/// comma-delimited bodies.
fn read_rows<R: Read>(mut reader: R) -> IoResult<Vec<Row>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    // Collect tuple bodies, keeping a line map for error reporting.
    let mut body = String::new();
    let mut lines = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| IoError::Malformed {
                line,
                reason: "expected a parenthesized tuple".into(),
            })?;
        body.push_str(inner);
        body.push('\n');
        lines.push(line);
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut rows = Vec::with_capacity(lines.len());
    for (i, result) in csv_reader.deserialize::<Vec<i64>>().enumerate() {
        let line = lines.get(i).copied().unwrap_or(0);
        let fields = result.map_err(|e| IoError::Malformed { line, reason: e.to_string() })?;
        rows.push(Row { line, fields });
    }
    Ok(rows)
}

// ── Field helpers ─────────────────────────────────────────────────────────────

fn expect_len(row: &Row, n: usize, what: &str) -> IoResult<()> {
    if row.fields.len() != n {
        return Err(IoError::Malformed {
            line: row.line,
            reason: format!("{what} needs {n} fields, got {}", row.fields.len()),
        });
    }
    Ok(())
}

fn to_u32(row: &Row, idx: usize, what: &str) -> IoResult<u32> {
    u32::try_from(row.fields[idx]).map_err(|_| IoError::Malformed {
        line: row.line,
        reason: format!("{what} {} out of range", row.fields[idx]),
    })
}

fn to_u64(row: &Row, idx: usize, what: &str) -> IoResult<u64> {
    u64::try_from(row.fields[idx]).map_err(|_| IoError::Malformed {
        line: row.line,
        reason: format!("{what} {} out of range", row.fields[idx]),
    })
}

// ── Public readers ────────────────────────────────────────────────────────────

/// Read car records: `(id, from, to, speed, planTime)`.
pub fn read_cars<R: Read>(reader: R) -> IoResult<Vec<CarRecord>> {
    read_rows(reader)?
        .iter()
        .map(|row| {
            expect_len(row, 5, "car record")?;
            Ok(CarRecord {
                id: row.fields[0],
                from: row.fields[1],
                to: row.fields[2],
                cap_speed: to_u32(row, 3, "car speed")?,
                plan_time: to_u64(row, 4, "plan time")?,
            })
        })
        .collect()
}

/// Read road records: `(id, length, speed, channel, from, to, isDuplex)`.
pub fn read_roads<R: Read>(reader: R) -> IoResult<Vec<RoadRecord>> {
    read_rows(reader)?
        .iter()
        .map(|row| {
            expect_len(row, 7, "road record")?;
            let is_duplex = match row.fields[6] {
                0 => false,
                1 => true,
                other => {
                    return Err(IoError::Malformed {
                        line: row.line,
                        reason: format!("isDuplex must be 0 or 1, got {other}"),
                    })
                }
            };
            Ok(RoadRecord {
                id: row.fields[0],
                length: to_u32(row, 1, "road length")?,
                speed_limit: to_u32(row, 2, "road speed")?,
                channels: to_u32(row, 3, "channel count")?,
                from: row.fields[4],
                to: row.fields[5],
                is_duplex,
            })
        })
        .collect()
}

/// Read cross records: `(id, roadId, roadId, roadId, roadId)` with `-1`
/// meaning an empty slot.
pub fn read_crosses<R: Read>(reader: R) -> IoResult<Vec<CrossRecord>> {
    read_rows(reader)?
        .iter()
        .map(|row| {
            expect_len(row, 5, "cross record")?;
            Ok(CrossRecord {
                id: row.fields[0],
                slots: [row.fields[1], row.fields[2], row.fields[3], row.fields[4]],
            })
        })
        .collect()
}

/// Read answer records: `(carId, StartTime, RoadID...)` with at least one
/// road.
pub fn read_answers<R: Read>(reader: R) -> IoResult<Vec<AnswerRecord>> {
    read_rows(reader)?
        .iter()
        .map(|row| {
            if row.fields.len() < 3 {
                return Err(IoError::Malformed {
                    line: row.line,
                    reason: format!(
                        "answer record needs a car, a start tick, and at least one road, got {} fields",
                        row.fields.len()
                    ),
                });
            }
            Ok(AnswerRecord {
                car_id: row.fields[0],
                start_tick: to_u64(row, 1, "start tick")?,
                roads: row.fields[2..].to_vec(),
            })
        })
        .collect()
}
