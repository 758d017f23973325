//! Level text format: symbol rows grouped into blocks named by `;` header lines.

use sokoban_core::{Cell, CellCoord, LevelError};
use tracing::{debug, warn};

const HEADER_MARKER: char = ';';

/// Immutable description of a single level as it appeared in the source text.
///
/// Every row holds exactly [`Level::columns`] cells; rows shorter than the
/// widest one are padded with [`Cell::SPACE`] while parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    name: String,
    columns: u32,
    cells: Vec<Vec<Cell>>,
}

impl Level {
    /// Builds a level from raw text rows.
    ///
    /// Line numbers reported through [`LevelError::InvalidSymbol`] count from
    /// the first provided row.
    pub fn from_rows<S>(name: impl Into<String>, rows: &[S]) -> Result<Self, LevelError>
    where
        S: AsRef<str>,
    {
        let lines: Vec<&str> = rows.iter().map(AsRef::as_ref).collect();
        Self::from_block(name.into(), &lines, 1)
    }

    fn from_block(name: String, lines: &[&str], first_line: usize) -> Result<Self, LevelError> {
        let numbered: Vec<(usize, &str)> = lines
            .iter()
            .map(|&line| line.strip_suffix('\r').unwrap_or(line))
            .enumerate()
            .map(|(index, line)| (first_line + index, line))
            .collect();

        let Some(first) = numbered.iter().position(|(_, line)| !is_blank(line)) else {
            return Err(LevelError::EmptyLevel);
        };
        let last = numbered
            .iter()
            .rposition(|(_, line)| !is_blank(line))
            .unwrap_or(first);

        let mut cells = numbered[first..=last]
            .iter()
            .map(|(number, line)| transform_row(line, *number))
            .collect::<Result<Vec<_>, _>>()?;

        let width = cells.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut cells {
            row.resize(width, Cell::SPACE);
        }

        Ok(Self {
            name,
            columns: u32::try_from(width).unwrap_or(u32::MAX),
            cells,
        })
    }

    /// Name taken from the level's header line.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns, equal to the longest row of the level.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the level.
    #[must_use]
    pub fn rows(&self) -> u32 {
        u32::try_from(self.cells.len()).unwrap_or(u32::MAX)
    }

    /// Returns the cell at the provided coordinate, or [`Cell::SPACE`] outside the level.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Cell {
        let row = usize::try_from(cell.row()).ok();
        let column = usize::try_from(cell.column()).ok();
        row.zip(column)
            .and_then(|(row, column)| self.cells.get(row)?.get(column).copied())
            .unwrap_or(Cell::SPACE)
    }

    /// Iterator over the rows of the level, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Iterator over every cell together with its coordinate in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        (0u32..).zip(self.cells.iter()).flat_map(|(row, cells)| {
            (0u32..)
                .zip(cells.iter())
                .map(move |(column, cell)| (CellCoord::new(column, row), *cell))
        })
    }

    /// Renders the level back into its text rows.
    ///
    /// Space cells become spaces and trailing spaces are dropped, so the rows
    /// parse back into an identical level.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| {
                let text: String = row.iter().map(|cell| cell.symbol().unwrap_or(' ')).collect();
                text.trim_end_matches(' ').to_owned()
            })
            .collect()
    }
}

/// Level that was dropped while parsing, together with the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedLevel {
    /// Name taken from the level's header line.
    pub name: String,
    /// One-based line number of the header that named the level.
    pub header_line: usize,
    /// Reason the level was rejected.
    pub reason: LevelError,
}

/// Outcome of parsing a multi-level text blob.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseReport {
    levels: Vec<Level>,
    skipped: Vec<SkippedLevel>,
}

impl ParseReport {
    /// Levels that parsed successfully, in source order.
    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Levels that were dropped, in source order.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedLevel] {
        &self.skipped
    }

    /// Consumes the report, yielding the successfully parsed levels.
    #[must_use]
    pub fn into_levels(self) -> Vec<Level> {
        self.levels
    }

    fn record(&mut self, name: String, header_line: usize, lines: &[&str], first_line: usize) {
        match Level::from_block(name.clone(), lines, first_line) {
            Ok(level) => {
                debug!(
                    level = %level.name(),
                    columns = level.columns(),
                    rows = level.rows(),
                    "level_parsed"
                );
                self.levels.push(level);
            }
            Err(reason) => {
                warn!(header_line, "skipping level \"{}\": {}", name, reason);
                self.skipped.push(SkippedLevel {
                    name,
                    header_line,
                    reason,
                });
            }
        }
    }
}

/// Where header lines sit relative to the rows they name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HeaderLayout {
    /// Each header closes and names the rows above it.
    Trailing,
    /// Each header opens and names the rows below it.
    Leading,
}

impl HeaderLayout {
    /// Headers lead only when nothing precedes the first one and rows follow
    /// the last one; a leading title line alone does not flip the layout.
    fn detect(lines: &[&str], headers: &[usize]) -> Self {
        let (Some(&first), Some(&last)) = (headers.first(), headers.last()) else {
            return Self::Trailing;
        };
        let blank_before = lines[..first].iter().all(|line| is_blank(line));
        let rows_after = lines[last + 1..].iter().any(|line| !is_blank(line));
        if blank_before && rows_after {
            Self::Leading
        } else {
            Self::Trailing
        }
    }
}

/// Parses a multi-level text blob into levels, skipping malformed ones.
///
/// Skipped levels are reported through `tracing`; use [`parse_with_report`]
/// to inspect them programmatically.
#[must_use]
pub fn parse(text: &str) -> Vec<Level> {
    parse_with_report(text).into_levels()
}

/// Parses a multi-level text blob and reports every level that was skipped.
#[must_use]
pub fn parse_with_report(text: &str) -> ParseReport {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let headers: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_header(line))
        .map(|(index, _)| index)
        .collect();

    let mut report = ParseReport::default();
    match HeaderLayout::detect(&lines, &headers) {
        HeaderLayout::Trailing => {
            let mut start = 0;
            for &end in &headers {
                report.record(header_name(lines[end]), end + 1, &lines[start..end], start + 1);
                start = end + 1;
            }
        }
        HeaderLayout::Leading => {
            for (position, &header) in headers.iter().enumerate() {
                let end = headers.get(position + 1).copied().unwrap_or(lines.len());
                report.record(
                    header_name(lines[header]),
                    header + 1,
                    &lines[header + 1..end],
                    header + 2,
                );
            }
        }
    }
    report
}

fn is_header(line: &str) -> bool {
    line.trim_start().starts_with(HEADER_MARKER)
}

fn header_name(line: &str) -> String {
    line.trim()
        .trim_matches(|symbol| symbol == HEADER_MARKER || symbol == ' ')
        .to_owned()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn transform_row(line: &str, line_number: usize) -> Result<Vec<Cell>, LevelError> {
    let offset = line.chars().position(|symbol| symbol != ' ');
    line.chars()
        .enumerate()
        .map(|(index, symbol)| match offset {
            Some(offset) if index >= offset => {
                Cell::from_symbol(symbol).ok_or(LevelError::InvalidSymbol {
                    symbol,
                    line: line_number,
                    column: index + 1,
                })
            }
            _ => Ok(Cell::SPACE),
        })
        .collect()
}
