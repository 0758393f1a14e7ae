use calamine::DataType;

/// The text content of a cell, or None for a missing value.
///
/// Whole numbers are written without a fractional part, so that a cell holding `1`
/// reads the same whether the workbook stored it as an integer or a float.
pub fn cell_to_text(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) if s.is_empty() => None,
        DataType::String(s) => Some(s.clone()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Float(f) => Some(float_to_text(*f)),
        // Serial date number, kept as is.
        DataType::DateTime(f) => Some(float_to_text(*f)),
        DataType::Bool(true) => Some("True".to_string()),
        DataType::Bool(false) => Some("False".to_string()),
        DataType::Error(_) => None,
        DataType::Empty => None,
    }
}

fn float_to_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

/// The name of a column, as found in the header row.
/// Columns without a name are called after their position.
pub fn header_name(idx: usize, cell: &DataType) -> String {
    cell_to_text(cell).unwrap_or_else(|| format!("Unnamed: {}", idx))
}

#[cfg(test)]
pub(crate) fn test_dir(name: &str) -> std::path::PathBuf {
    let d = std::env::temp_dir().join(format!("courserank-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&d);
    std::fs::create_dir_all(&d).unwrap();
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn cells() {
        assert_eq!(cell_to_text(&DataType::Empty), None);
        assert_eq!(cell_to_text(&DataType::String("".to_string())), None);
        assert_eq!(
            cell_to_text(&DataType::String(" ACC 501 ".to_string())),
            Some(" ACC 501 ".to_string())
        );
        assert_eq!(cell_to_text(&DataType::Int(1)), Some("1".to_string()));
        assert_eq!(cell_to_text(&DataType::Float(1.0)), Some("1".to_string()));
        assert_eq!(cell_to_text(&DataType::Float(0.0)), Some("0".to_string()));
        assert_eq!(cell_to_text(&DataType::Float(2.5)), Some("2.5".to_string()));
        assert_eq!(cell_to_text(&DataType::Bool(true)), Some("True".to_string()));
        assert_eq!(cell_to_text(&DataType::Error(CellErrorType::NA)), None);
    }

    #[test]
    fn headers() {
        assert_eq!(header_name(3, &DataType::Empty), "Unnamed: 3");
        assert_eq!(
            header_name(0, &DataType::String("Finished".to_string())),
            "Finished"
        );
    }
}
