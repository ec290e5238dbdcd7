use std::fmt::{Display, Formatter};

use crate::replacement::{SimulationResult, SweepPoint};

/// Write a bordered table, each column as wide as its widest cell.
fn write_table(f: &mut Formatter<'_>, headers: &[&str], rows: &[Vec<String>]) -> std::fmt::Result {
    // Calculate initial widths with column name
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let print_border = |f: &mut Formatter<'_>| -> std::fmt::Result {
        write!(f, "+")?;
        for width in &widths {
            write!(f, "{:-<width$}+", "", width = width + 2)?;
        }
        writeln!(f)
    };

    print_border(f)?;
    write!(f, "|")?;
    for (i, header) in headers.iter().enumerate() {
        write!(f, " {:width$} |", header, width = widths[i])?;
    }
    writeln!(f)?;
    print_border(f)?;

    for row in rows {
        write!(f, "|")?;
        for (i, cell) in row.iter().enumerate() {
            write!(f, " {:width$} |", cell, width = widths[i])?;
        }
        writeln!(f)?;
    }
    print_border(f)
}

/// A memory state rendered as `[a, b, c]`.
pub struct MemoryState<'a, P>(pub &'a [P]);

impl<'a, P: Display> Display for MemoryState<'a, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, page) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", page)?;
        }
        write!(f, "]")
    }
}

/// Renders a simulation trace as a table with one row per request.
pub struct TraceTable<'a, P> {
    result: &'a SimulationResult<P>,
}

impl<'a, P> TraceTable<'a, P> {
    pub fn new(result: &'a SimulationResult<P>) -> Self {
        Self { result }
    }
}

impl<'a, P: Display> Display for TraceTable<'a, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.result.records.is_empty() {
            return writeln!(f, "Empty trace");
        }
        let rows: Vec<Vec<String>> = self
            .result
            .records
            .iter()
            .map(|r| {
                vec![
                    r.requested.to_string(),
                    MemoryState(&r.memory_state).to_string(),
                    r.cumulative_faults.to_string(),
                ]
            })
            .collect();
        write_table(f, &["Page", "Memory State", "Page Fault"], &rows)
    }
}

/// Renders the outcome of a frame sweep.
pub struct SweepTable<'a> {
    points: &'a [SweepPoint],
}

impl<'a> SweepTable<'a> {
    pub fn new(points: &'a [SweepPoint]) -> Self {
        Self { points }
    }
}

impl<'a> Display for SweepTable<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.points.is_empty() {
            return writeln!(f, "Empty sweep");
        }
        let rows: Vec<Vec<String>> = self
            .points
            .iter()
            .map(|p| vec![p.frames.to_string(), p.faults.to_string()])
            .collect();
        write_table(f, &["Frames", "Page Faults"], &rows)
    }
}
