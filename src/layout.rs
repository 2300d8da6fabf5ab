// ProxAlert - Character Display Text Layout
//
// Turns a message into the write sequence for a 16x2 character display.
// Row 0 takes characters until the first line break or the 16th character,
// whichever comes first; that single event moves the cursor to row 1.
// Everything after that appends to row 1, further breaks are swallowed.

use crate::config::*;

/// One step of a display update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcdOp {
    /// Clear the display and home the cursor.
    Clear,
    /// Wait for the controller to finish a slow command.
    Settle,
    /// Move the cursor to row 1, column 0.
    NextRow,
    /// Write one character at the cursor.
    Put { row: u8, col: usize, ch: char },
}

pub fn layout(text: &str) -> Vec<LcdOp> {
    let mut ops = Vec::with_capacity(text.len() + 3);
    ops.push(LcdOp::Clear);
    ops.push(LcdOp::Settle);

    let mut row: u8 = 0;
    let mut col: usize = 0;

    for ch in text.chars() {
        if ch == LCD_LINE_BREAK {
            if row == 0 {
                row = 1;
                col = 0;
                ops.push(LcdOp::NextRow);
            }
            continue;
        }

        ops.push(LcdOp::Put { row, col, ch });
        col += 1;

        if row == 0 && col == LCD_COLUMNS {
            row = 1;
            col = 0;
            ops.push(LcdOp::NextRow);
        }
    }

    ops
}

/// Reassemble the visible rows from a layout, for logging and tests.
pub fn rows(ops: &[LcdOp]) -> [String; 2] {
    let mut rows = [String::new(), String::new()];
    for op in ops {
        if let LcdOp::Put { row, ch, .. } = op {
            rows[usize::from(*row)].push(*ch);
        }
    }
    rows
}
