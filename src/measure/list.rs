use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MeasurementKind {
    Distance,
    Area,
}

impl MeasurementKind {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Distance => "Distances",
            Self::Area => "Areas",
        }
    }

    pub const fn header(self) -> &'static str {
        match self {
            Self::Distance => "N\tDistance\tUnit",
            Self::Area => "N\tArea\tUnit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRow {
    pub index: usize,
    pub value: f64,
    pub unit: String,
}

impl MeasurementRow {
    pub fn to_line(&self) -> String {
        format!("{}\t{}\t{}", self.index, format_value(self.value), self.unit)
    }
}

/// Numbered measurement rows, exported as a header line plus one
/// tab-separated line per row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementList {
    kind: MeasurementKind,
    rows: Vec<MeasurementRow>,
}

impl MeasurementList {
    pub fn new(kind: MeasurementKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
        }
    }

    pub fn kind(&self) -> MeasurementKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn header(&self) -> &'static str {
        self.kind.header()
    }

    /// Appends a row and returns its 1-based number.
    pub fn push(&mut self, value: f64, unit: impl Into<String>) -> usize {
        let index = self.rows.len() + 1;
        self.rows.push(MeasurementRow {
            index,
            value,
            unit: unit.into(),
        });
        index
    }

    pub fn rows(&self) -> &[MeasurementRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_text(&self) -> String {
        let mut lines = vec![self.header().to_string()];
        lines.extend(self.rows.iter().map(MeasurementRow::to_line));
        lines.join("\n")
    }
}

/// Integral values print without decimals; others keep up to four.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{value:.0}");
    }
    let text = format!("{value:.4}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
