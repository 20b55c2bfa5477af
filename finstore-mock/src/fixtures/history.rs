pub fn by_code(code: &str) -> Option<Vec<(&'static str, &'static str)>> {
    match code {
        "MSCI_WORLD" => Some(vec![
            ("2024-01-02", "3163.45"),
            ("2024-01-03", "3128.71"),
            ("2024-01-04", "3117.02"),
            ("2024-01-05", "3125.88"),
            ("2024-01-08", "3164.90"),
            ("2024-01-09", "3159.31"),
            ("2024-01-10", "3173.55"),
            ("2024-01-11", "3178.04"),
            ("2024-01-12", "3181.34"),
        ]),
        "USD_RUB" => Some(vec![
            ("2024-01-10", "89.6883"),
            ("2024-01-11", "89.2887"),
            ("2024-01-12", "88.6480"),
            ("2024-01-13", "88.5170"),
        ]),
        "ZERO" => Some(vec![("2024-01-10", "0"), ("2024-01-11", "0")]),
        _ => None,
    }
}
