/// Extract the URL from a CSS `url(...)` value, stripping quotes.
pub fn parse_css_url(value: &str) -> Option<String> {
    let value = value.trim();
    let start = value.find("url(")? + 4;
    let end = start + value[start..].find(')')?;
    let url = value[start..end]
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

pub fn css_url(src: &str) -> String {
    format!("url({src})")
}

pub fn px(v: f64) -> String {
    format!("{v}px")
}

/// `background-position` for a piece at (column, row).
pub fn background_position_css(x_pct: f64, y_pct: f64) -> String {
    // Adding zero turns -0 into 0.
    format!("{}% {}%", x_pct + 0.0, y_pct + 0.0)
}

/// `background-size` so that the source spans `width` pixels.
pub fn background_size_css(width: f64) -> String {
    format!("{width}px auto")
}

pub fn transform_css(x: f64, y: f64) -> String {
    format!("translateX({x}px) translateY({y}px)")
}
