//! Positioned text runs from PDF content streams
//!
//! Table PDFs usually draw every cell as its own text object. Runs that
//! share a baseline form a row; ordering a row by x gives its cells.

use lopdf::content::Operation;
use lopdf::Object;

use super::pdf::{split_line, RawTable};

/// Baselines closer than this (user-space units) belong to one row
const ROW_TOLERANCE: f64 = 2.0;

/// TJ adjustments at or below this (thousandths of an em) read as a space
const TJ_SPACE_ADJUSTMENT: f64 = -200.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

// ============================================================================
// TEXT STATE
// ============================================================================

/// Affine matrix `[a b c d e f]`
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f64; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translation(tx: f64, ty: f64) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self x other`
    fn then(self, other: Matrix) -> Self {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }
}

struct TextState {
    ctm: Matrix,
    saved: Vec<Matrix>,
    line: Matrix,
    text: Matrix,
    leading: f64,
    /// Positioned since the last show; otherwise text continues the last run
    moved: bool,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            saved: Vec::new(),
            line: Matrix::IDENTITY,
            text: Matrix::IDENTITY,
            leading: 0.0,
            moved: true,
        }
    }

    fn begin_text(&mut self) {
        self.line = Matrix::IDENTITY;
        self.text = Matrix::IDENTITY;
        self.moved = true;
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.line = Matrix::translation(tx, ty).then(self.line);
        self.text = self.line;
        self.moved = true;
    }

    fn set_matrix(&mut self, m: Matrix) {
        self.line = m;
        self.text = m;
        self.moved = true;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn show(&mut self, runs: &mut Vec<TextRun>, text: String) {
        if text.is_empty() {
            return;
        }
        if !self.moved {
            if let Some(last) = runs.last_mut() {
                last.text.push_str(&text);
                return;
            }
        }
        let (tx, ty) = self.text.apply(0.0, 0.0);
        let (x, y) = self.ctm.apply(tx, ty);
        runs.push(TextRun { x, y, text });
        self.moved = false;
    }
}

// ============================================================================
// OPERATIONS
// ============================================================================

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn numbers(operands: &[Object]) -> Vec<f64> {
    operands.iter().filter_map(number).collect()
}

/// Latin-1 for simple fonts, UTF-16BE when the string carries a BOM
fn decode_string(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(body) => {
            let units: Vec<u16> = body
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Text shown by a Tj / ' / " / TJ operand
fn shown_text(obj: &Object) -> String {
    match obj {
        Object::String(bytes, _) => decode_string(bytes),
        Object::Array(items) => {
            let mut text = String::new();
            for item in items {
                match item {
                    Object::String(bytes, _) => text.push_str(&decode_string(bytes)),
                    other => {
                        if number(other).is_some_and(|adj| adj <= TJ_SPACE_ADJUSTMENT) {
                            text.push(' ');
                        }
                    }
                }
            }
            text
        }
        _ => String::new(),
    }
}

/// Walk a page's content operations and collect every shown string with
/// its device-space origin
pub fn runs_from_operations(operations: &[Operation]) -> Vec<TextRun> {
    let mut state = TextState::new();
    let mut runs = Vec::new();

    for op in operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => state.saved.push(state.ctm),
            "Q" => {
                if let Some(ctm) = state.saved.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let [a, b, c, d, e, f] = numbers(operands).as_slice() {
                    state.ctm = Matrix([*a, *b, *c, *d, *e, *f]).then(state.ctm);
                }
            }
            "BT" => state.begin_text(),
            "Td" => {
                if let [tx, ty] = numbers(operands).as_slice() {
                    state.move_line(*tx, *ty);
                }
            }
            "TD" => {
                if let [tx, ty] = numbers(operands).as_slice() {
                    state.leading = -*ty;
                    state.move_line(*tx, *ty);
                }
            }
            "TL" => {
                if let [leading] = numbers(operands).as_slice() {
                    state.leading = *leading;
                }
            }
            "Tm" => {
                if let [a, b, c, d, e, f] = numbers(operands).as_slice() {
                    state.set_matrix(Matrix([*a, *b, *c, *d, *e, *f]));
                }
            }
            "T*" => state.next_line(),
            "Tj" | "TJ" => {
                if let Some(obj) = operands.last() {
                    state.show(&mut runs, shown_text(obj));
                }
            }
            "'" | "\"" => {
                state.next_line();
                if let Some(obj) = operands.last() {
                    state.show(&mut runs, shown_text(obj));
                }
            }
            _ => {}
        }
    }

    runs
}

// ============================================================================
// ROWS
// ============================================================================

/// Group runs into rows top to bottom, cells left to right.
///
/// A row drawn as a single run is split on tab/pipe/wide-space separators.
pub fn runs_to_rows(mut runs: Vec<TextRun>) -> RawTable {
    runs.retain(|run| !run.text.trim().is_empty());
    runs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut rows: Vec<(f64, Vec<TextRun>)> = Vec::new();
    for run in runs {
        let same_row = rows
            .last()
            .is_some_and(|(baseline, _)| (baseline - run.y).abs() <= ROW_TOLERANCE);
        match rows.last_mut() {
            Some((_, cells)) if same_row => cells.push(run),
            _ => rows.push((run.y, vec![run])),
        }
    }

    rows.into_iter()
        .map(|(_, mut cells)| {
            cells.sort_by(|a, b| a.x.total_cmp(&b.x));
            match cells.as_slice() {
                [only] => split_line(&only.text),
                _ => cells.iter().map(|c| c.text.trim().to_string()).collect(),
            }
        })
        .filter(|row: &Vec<String>| row.iter().any(|c| !c.is_empty()))
        .collect()
}
