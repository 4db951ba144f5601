use crate::errors::ContingencyError;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    let mut s = String::new();
    for i in items {
        s.push_str(i);
        s.push_str(&String::from(", "));
    }
    s
}

pub fn fmt_vec_output(v: &[f64]) -> String {
    let mut res = String::new();
    if let Some(last) = v.len().checked_sub(1) {
        if last == 0 {
            return format!("{:.4}", v[0]);
        }
        for n in &v[..last] {
            res.push_str(format!("{:.4}", n).as_str());
            res.push_str(", ");
        }
        res.push_str(format!("{:.4}", &v[last]).as_str());
    }
    res
}

// Validation
pub fn validate_open_unit_parameter(value: f64, parameter: &str) -> Result<(), ContingencyError> {
    if value.is_nan() || value <= 0.0 || value >= 1.0 {
        Err(ContingencyError::InvalidParameter(
            parameter.to_string(),
            "real value strictly between 0 and 1".to_string(),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Sum of the rows of a row-major matrix.
#[inline]
pub fn row_sums(values: &[f64], rows: usize, cols: usize) -> Vec<f64> {
    (0..rows).map(|i| values[i * cols..(i + 1) * cols].iter().sum()).collect()
}

/// Sum of the columns of a row-major matrix.
#[inline]
pub fn col_sums(values: &[f64], rows: usize, cols: usize) -> Vec<f64> {
    (0..cols).map(|j| (0..rows).map(|i| values[i * cols + j]).sum()).collect()
}
