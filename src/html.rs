use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Selector};

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| ScrapeError::selector(css))
}

/// Concatenated, trimmed text content of an element.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn text_of_should_join_nested_text() {
        let html = Html::parse_fragment("<p> Tony <b>Parker</b>\n</p>");
        let p = html.select(&selector("p").unwrap()).next().unwrap();
        assert_eq!(text_of(p), "Tony Parker");
    }

    #[test]
    fn bad_selector_should_be_reported() {
        let err = selector("td[").unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidSelector(s) if s == "td["));
    }
}
