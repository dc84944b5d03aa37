use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("no rows given")]
    Empty,
    #[error("{0} is not a row number")]
    NotANumber(String),
    #[error("rows start at 1")]
    Zero,
    #[error("range {0} runs backwards")]
    Backwards(String),
    #[error("{rows} reaches past row {max_row}, the last row a page can have")]
    TooLarge { rows: String, max_row: usize },
}

/// Parses row lists like `1,3 5-7` into row numbers, keeping their order.
///
/// No row may exceed `max_row`.
pub fn parse_rows(input: &str, max_row: usize) -> Result<Vec<usize>, SelectionError> {
    let mut rows = Vec::new();
    for part in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
    {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_row(start)?, parse_row(end)?),
            None => {
                let row = parse_row(part)?;
                (row, row)
            }
        };
        if start > end {
            return Err(SelectionError::Backwards(part.to_string()));
        }
        if end > max_row {
            return Err(SelectionError::TooLarge {
                rows: part.to_string(),
                max_row,
            });
        }
        rows.extend(start..=end);
    }

    if rows.is_empty() {
        Err(SelectionError::Empty)
    } else {
        Ok(rows)
    }
}

fn parse_row(row: &str) -> Result<usize, SelectionError> {
    match row.trim().parse() {
        Ok(0) => Err(SelectionError::Zero),
        Ok(row) => Ok(row),
        Err(_) => Err(SelectionError::NotANumber(row.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    const MAX_ROW: usize = 100;

    #[rstest]
    #[case("4", vec![4])]
    #[case("98-100", vec![98, 99, 100])]
    #[case("1,3,5-7", vec![1, 3, 5, 6, 7])]
    #[case("9 2  3-3", vec![9, 2, 3])]
    #[case(" 1, 2 ,", vec![1, 2])]
    fn test_parse_rows_accepts_lists_and_ranges(#[case] input: &str, #[case] expected: Vec<usize>) {
        assert_eq!(expected, assert_ok!(parse_rows(input, MAX_ROW)));
    }

    #[rstest]
    #[case("", SelectionError::Empty)]
    #[case(" , ", SelectionError::Empty)]
    #[case("0", SelectionError::Zero)]
    #[case("2,x", SelectionError::NotANumber("x".to_string()))]
    #[case("7-5", SelectionError::Backwards("7-5".to_string()))]
    #[case("-5", SelectionError::NotANumber(String::new()))]
    #[case("101", SelectionError::TooLarge { rows: "101".to_string(), max_row: MAX_ROW })]
    #[case("1,99-101", SelectionError::TooLarge { rows: "99-101".to_string(), max_row: MAX_ROW })]
    #[case(
        "1-18446744073709551615",
        SelectionError::TooLarge { rows: "1-18446744073709551615".to_string(), max_row: MAX_ROW }
    )]
    #[case(
        "1-9999999999",
        SelectionError::TooLarge { rows: "1-9999999999".to_string(), max_row: MAX_ROW }
    )]
    fn test_parse_rows_rejects_invalid_input(#[case] input: &str, #[case] expected: SelectionError) {
        assert_eq!(expected, assert_err!(parse_rows(input, MAX_ROW)));
    }
}
