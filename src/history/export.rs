//! Tabular export and import of a history.
//!
//! One row per turn, with a leading row-index column:
//!
//! ```text
//! ,p1,p2,p3,centre_pile,player_in_play,dices
//! 0,100,100,100,0,,
//! 1,100,100,100,0,1,"['d', 'd', 'd']"
//! ```
//!
//! Turn 0 leaves `player_in_play` and `dices` empty. Reading also accepts
//! files without the index column and player ids written as floats (`1.0`).

use std::io::{Read, Write};

use csv::{ErrorKind, ReaderBuilder, StringRecord, WriterBuilder};
use tracing::debug;

use super::record::{History, TurnRecord};
use crate::core::{DiceRoll, PlayerId, PlayerMap, MAX_PLAYERS};
use crate::error::{HistoryError, HistoryResult};

const CENTRE_COLUMN: &str = "centre_pile";
const PLAYER_COLUMN: &str = "player_in_play";
const DICE_COLUMN: &str = "dices";

/// Column names, without the index column.
#[must_use]
pub fn columns(player_count: usize) -> Vec<String> {
    PlayerId::all(player_count)
        .map(|id| format!("p{}", id.get()))
        .chain([CENTRE_COLUMN, PLAYER_COLUMN, DICE_COLUMN].map(String::from))
        .collect()
}

impl History {
    /// Write the history as CSV.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `writer`.
    pub fn write_csv<W: Write>(&self, writer: W) -> HistoryResult<()> {
        let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

        let mut header = vec![String::new()];
        header.extend(columns(self.player_count()));
        csv_writer.write_record(&header)?;

        for (turn, record) in self.iter().enumerate() {
            let mut row = vec![turn.to_string()];
            row.extend(record.chips.as_slice().iter().map(i64::to_string));
            row.push(record.centre_pile.to_string());
            row.push(
                record
                    .active_player
                    .map(|id| id.get().to_string())
                    .unwrap_or_default(),
            );
            row.push(record.dice.as_ref().map(DiceRoll::to_cell).unwrap_or_default());
            csv_writer.write_record(&row)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Read a history written by [`History::write_csv`].
    ///
    /// # Errors
    ///
    /// Fails with a data-format error on a bad header, a row with the wrong
    /// number of cells, an unparseable number or a malformed dice cell.
    pub fn read_csv<R: Read>(reader: R) -> HistoryResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let header = csv_reader.headers()?.clone();
        if header.is_empty() {
            return Err(HistoryError::Empty);
        }
        let layout = Layout::from_header(&header)?;

        let mut history = History::new(layout.player_count);
        for (row, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|err| row_error(err, row))?;
            history.push(layout.parse_row(&record, row)?);
        }

        if history.is_empty() {
            return Err(HistoryError::Empty);
        }
        debug!(turns = history.len(), players = history.player_count(), "read history");
        Ok(history)
    }

    /// Render as an aligned text table for terminal display.
    #[must_use]
    pub fn to_table(&self) -> String {
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(self.len() + 1);

        let mut header = vec![String::new()];
        header.extend(columns(self.player_count()));
        rows.push(header);

        for (turn, record) in self.iter().enumerate() {
            let mut row = vec![turn.to_string()];
            row.extend(record.chips.as_slice().iter().map(i64::to_string));
            row.push(record.centre_pile.to_string());
            row.push(
                record
                    .active_player
                    .map_or_else(|| "NaN".to_string(), |id| id.get().to_string()),
            );
            row.push(record.dice.as_ref().map_or_else(|| "NaN".to_string(), DiceRoll::to_cell));
            rows.push(row);
        }

        let widths: Vec<usize> = (0..rows[0].len())
            .map(|col| rows.iter().map(|r| r[col].len()).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        for row in &rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:>width$}"))
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

/// A ragged row becomes `MalformedRow`; anything else stays a CSV error.
fn row_error(err: csv::Error, row: usize) -> HistoryError {
    if let ErrorKind::UnequalLengths { expected_len, len, .. } = err.kind() {
        return HistoryError::MalformedRow {
            row,
            reason: format!("expected {expected_len} cells, found {len}"),
        };
    }
    HistoryError::Csv(err)
}

/// Column positions discovered from a header row.
struct Layout {
    has_index: bool,
    player_count: usize,
}

impl Layout {
    fn from_header(header: &StringRecord) -> HistoryResult<Self> {
        let malformed = || HistoryError::MalformedHeader(header.iter().collect::<Vec<_>>().join(","));

        let has_index = header
            .get(0)
            .is_some_and(|c| c.is_empty() || c.starts_with("Unnamed"));
        let cells: Vec<&str> = header.iter().skip(usize::from(has_index)).collect();

        let player_count = cells.len().saturating_sub(3);
        if player_count == 0 || player_count > MAX_PLAYERS {
            return Err(malformed());
        }
        if cells != columns(player_count) {
            return Err(malformed());
        }

        Ok(Self {
            has_index,
            player_count,
        })
    }

    fn parse_row(&self, record: &StringRecord, row: usize) -> HistoryResult<TurnRecord> {
        let cells: Vec<&str> = record.iter().skip(usize::from(self.has_index)).collect();
        let expected = self.player_count + 3;
        if cells.len() != expected {
            return Err(HistoryError::MalformedRow {
                row,
                reason: format!("expected {expected} cells, found {}", cells.len()),
            });
        }

        let chips = cells[..self.player_count]
            .iter()
            .map(|cell| parse_int(cell, row))
            .collect::<HistoryResult<Vec<i64>>>()?;
        let centre_pile = parse_int(cells[self.player_count], row)?;
        let active_player = parse_player(cells[self.player_count + 1], row, self.player_count)?;

        let dice_cell = cells[self.player_count + 2].trim();
        let dice = if dice_cell.is_empty() || dice_cell.eq_ignore_ascii_case("nan") {
            None
        } else {
            Some(DiceRoll::parse_cell(dice_cell, row)?)
        };

        Ok(TurnRecord {
            chips: PlayerMap::from_vec(chips),
            centre_pile,
            active_player,
            dice,
        })
    }
}

fn parse_int(cell: &str, row: usize) -> HistoryResult<i64> {
    let cell = cell.trim();
    let integral = cell.strip_suffix(".0").unwrap_or(cell);
    integral.parse().map_err(|_| HistoryError::MalformedRow {
        row,
        reason: format!("not an integer: {cell:?}"),
    })
}

fn parse_player(cell: &str, row: usize, player_count: usize) -> HistoryResult<Option<PlayerId>> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let id = parse_int(cell, row)?;
    if id < 1 || id > player_count as i64 {
        return Err(HistoryError::MalformedRow {
            row,
            reason: format!("player {id} outside 1..={player_count}"),
        });
    }
    Ok(Some(PlayerId::new(id as u8)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DiceSymbol::*;

    const SAMPLE: &str = "\
,p1,p2,p3,centre_pile,player_in_play,dices
0,100,100,100,0,,
1,100,100,100,0,1.0,\"['d', 'd', 'd']\"
2,101,97,101,1,2.0,\"['L', 'R', 'C']\"
3,100,97,101,2,3.0,\"[]\"
";

    #[test]
    fn test_columns() {
        assert_eq!(
            columns(2),
            vec!["p1", "p2", "centre_pile", "player_in_play", "dices"]
        );
    }

    #[test]
    fn test_read_sample() {
        let history = History::read_csv(SAMPLE.as_bytes()).unwrap();

        assert_eq!(history.player_count(), 3);
        assert_eq!(history.len(), 4);
        assert_eq!(history.get(0).unwrap().dice, None);
        assert_eq!(history.get(0).unwrap().active_player, None);

        let second = history.get(2).unwrap();
        assert_eq!(second.chips.as_slice(), &[101, 97, 101]);
        assert_eq!(second.active_player, Some(PlayerId::new(2)));
        assert_eq!(second.dice.as_ref().unwrap().symbols(), &[Left, Right, Centre]);

        assert!(history.get(3).unwrap().dice.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let history = History::read_csv(SAMPLE.as_bytes()).unwrap();
        let mut buf = Vec::new();
        history.write_csv(&mut buf).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with(",p1,p2,p3,centre_pile,player_in_play,dices\n0,100,100,100,0,,\n"));
        assert!(text.contains("2,101,97,101,1,2,\"['L', 'R', 'C']\""));

        assert_eq!(History::read_csv(buf.as_slice()).unwrap(), history);
    }

    #[test]
    fn test_read_without_index_column() {
        let csv = "p1,p2,centre_pile,player_in_play,dices\n5,5,0,,\n4,5,1,1,\"['C']\"\n";
        let history = History::read_csv(csv.as_bytes()).unwrap();
        assert_eq!(history.player_count(), 2);
        assert_eq!(history.last().unwrap().centre_pile, 1);
    }

    #[test]
    fn test_read_with_bom_and_crlf() {
        let csv = "\u{feff},p1,p2,centre_pile,player_in_play,dices\r\n0,5,5,0,,\r\n1,4,5,1,1,\"['C']\"\r\n";
        let history = History::read_csv(csv.as_bytes()).unwrap();

        assert_eq!(history.player_count(), 2);
        assert_eq!(history.len(), 2);
        let last = history.last().unwrap();
        assert_eq!(last.chips.as_slice(), &[4, 5]);
        assert_eq!(last.active_player, Some(PlayerId::new(1)));
        assert_eq!(last.dice.as_ref().unwrap().symbols(), &[Centre]);
    }

    #[test]
    fn test_quoted_cell_with_escaped_quote_is_a_dice_error() {
        let csv = ",p1,p2,centre_pile,player_in_play,dices\n0,5,5,0,1,\"['L'\"\", 'R']\"\n";
        assert!(matches!(
            History::read_csv(csv.as_bytes()),
            Err(HistoryError::MalformedDice { row: 0, .. })
        ));
    }

    #[test]
    fn test_read_errors() {
        assert!(matches!(History::read_csv("".as_bytes()), Err(HistoryError::Empty)));
        assert!(matches!(
            History::read_csv(",a,b\n".as_bytes()),
            Err(HistoryError::MalformedHeader(_))
        ));
        assert!(matches!(
            History::read_csv(",p1,p2,centre_pile,player_in_play,dices\n".as_bytes()),
            Err(HistoryError::Empty)
        ));

        let bad_dice = ",p1,p2,centre_pile,player_in_play,dices\n0,5,5,0,,\n1,5,5,0,1,\"L R\"\n";
        assert!(matches!(
            History::read_csv(bad_dice.as_bytes()),
            Err(HistoryError::MalformedDice { row: 1, .. })
        ));

        let bad_number = ",p1,p2,centre_pile,player_in_play,dices\n0,five,5,0,,\n";
        assert!(matches!(
            History::read_csv(bad_number.as_bytes()),
            Err(HistoryError::MalformedRow { row: 0, .. })
        ));

        let short_row = ",p1,p2,centre_pile,player_in_play,dices\n0,5,5\n";
        assert!(matches!(
            History::read_csv(short_row.as_bytes()),
            Err(HistoryError::MalformedRow { row: 0, .. })
        ));

        let bad_player = ",p1,p2,centre_pile,player_in_play,dices\n0,5,5,0,3,\"[]\"\n";
        assert!(matches!(
            History::read_csv(bad_player.as_bytes()),
            Err(HistoryError::MalformedRow { row: 0, .. })
        ));
    }

    #[test]
    fn test_to_table() {
        let history = History::read_csv(SAMPLE.as_bytes()).unwrap();
        let table = history.to_table();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("centre_pile"));
        assert!(lines[1].contains("NaN"));
        assert!(lines[2].ends_with("['d', 'd', 'd']"));
    }
}
