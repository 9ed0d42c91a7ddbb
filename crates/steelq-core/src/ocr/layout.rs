//! Layout reconstruction from recognized fragments.
//!
//! Labels are printed as loose tables. Items are grouped into rows by their
//! vertical center and each row is split into columns wherever the horizontal
//! distance between neighbouring tokens exceeds a gap.

use std::cmp::Ordering;

use tracing::trace;

use super::InputItem;
use crate::steel::rules::tokenize;

/// Ordering key of a token within its row.
///
/// Tokens split out of one item share the item's horizontal center and are
/// ordered by `(origin, sub)`, so they stay contiguous and in reading order.
#[derive(Debug, Clone, Copy)]
pub struct TokenOrder {
    /// Horizontal center of the originating item.
    pub x: f32,
    /// Position of the originating item within the row.
    pub origin: usize,
    /// Position of the token within the originating item.
    pub sub: usize,
}

impl PartialEq for TokenOrder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TokenOrder {}

impl PartialOrd for TokenOrder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TokenOrder {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then(self.origin.cmp(&other.origin))
            .then(self.sub.cmp(&other.sub))
    }
}

/// An atomic text segment positioned within a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub order: TokenOrder,
}

/// Items whose vertical centers cluster together.
#[derive(Debug, Clone)]
pub struct Row<'a> {
    pub items: Vec<&'a InputItem>,
    /// Running average of accepted vertical centers.
    pub center_y: f32,
}

/// A left-to-right run of tokens within one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    pub tokens: Vec<Token>,
}

impl Column {
    /// Token texts in column order.
    pub fn values(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.value.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// The columns reconstructed for one row.
#[derive(Debug, Clone)]
pub struct RowLayout {
    pub center_y: f32,
    pub columns: Vec<Column>,
}

impl RowLayout {
    /// Group items into rows and each row into columns.
    pub fn analyze(items: &[InputItem], y_threshold: f32, x_gap: f32) -> Vec<RowLayout> {
        cluster_rows(items, y_threshold)
            .iter()
            .map(|row| RowLayout {
                center_y: row.center_y,
                columns: cluster_columns(row_tokens(row), x_gap),
            })
            .collect()
    }

    /// All tokens of the row in column order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.columns.iter().flat_map(|c| c.tokens.iter())
    }
}

/// Group items into rows by vertical center.
///
/// Items are visited top to bottom. An item joins the open row when its
/// center lies within `y_threshold` of the row's running average, which then
/// moves halfway towards the item; this lets a slightly skewed row stay one
/// row.
pub fn cluster_rows(items: &[InputItem], y_threshold: f32) -> Vec<Row<'_>> {
    let mut sorted: Vec<(&InputItem, f32)> = items.iter().map(|it| (it, it.center_y())).collect();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut rows: Vec<Row<'_>> = Vec::new();
    let mut current: Option<Row<'_>> = None;

    for (item, cy) in sorted {
        match current.as_mut() {
            Some(row) if (cy - row.center_y).abs() <= y_threshold => {
                row.items.push(item);
                row.center_y = (row.center_y + cy) / 2.0;
            }
            _ => {
                if let Some(row) = current.take() {
                    rows.push(row);
                }
                current = Some(Row {
                    items: vec![item],
                    center_y: cy,
                });
            }
        }
    }
    rows.extend(current);

    trace!("Clustered {} items into {} rows", items.len(), rows.len());
    rows
}

/// Tokenize the items of a row, keyed for column clustering.
pub fn row_tokens(row: &Row<'_>) -> Vec<Token> {
    let mut items: Vec<(&InputItem, f32)> = row.items.iter().map(|it| (*it, it.center_x())).collect();
    items.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut tokens: Vec<Token> = items
        .iter()
        .enumerate()
        .flat_map(|(origin, (item, cx))| {
            tokenize(item.text.trim())
                .enumerate()
                .map(move |(sub, value)| Token {
                    value,
                    order: TokenOrder {
                        x: *cx,
                        origin,
                        sub,
                    },
                })
        })
        .collect();

    tokens.sort_by(|a, b| a.order.cmp(&b.order));
    tokens
}

/// Split ordered tokens into columns.
///
/// A new column starts whenever a token is more than `x_gap` to the right of
/// the previous token.
pub fn cluster_columns(mut tokens: Vec<Token>, x_gap: f32) -> Vec<Column> {
    tokens.sort_by(|a, b| a.order.cmp(&b.order));

    let mut columns: Vec<Column> = Vec::new();
    let mut current = Column::default();
    let mut last_x: Option<f32> = None;

    for token in tokens {
        let x = token.order.x;
        if let Some(prev) = last_x {
            if (x - prev).abs() > x_gap {
                columns.push(std::mem::take(&mut current));
            }
        }
        current.tokens.push(token);
        last_x = Some(x);
    }

    if !current.is_empty() {
        columns.push(current);
    }
    columns
}
