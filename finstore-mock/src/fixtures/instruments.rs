pub fn all() -> &'static [(&'static str, &'static str)] {
    &[
        ("MSCI_WORLD", "MSCI World Net USD"),
        ("USD_RUB", "US Dollar / Russian Ruble (CBR)"),
        ("ZERO", "Constant zero"),
    ]
}
