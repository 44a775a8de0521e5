use url::Url;

/// Build the address of one listing page
pub fn listing_page_url(
    base_url: &str,
    listing_path: &str,
    org_id: u64,
    page: u32,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?.join(listing_path)?;
    url.query_pairs_mut()
        .append_pair("orgsid", &org_id.to_string())
        .append_pair("pagenum", &page.to_string());
    Ok(url)
}

/// Resolve a relative row link against the site root
pub fn absolute_url(base_url: &str, href: &str) -> Result<String, url::ParseError> {
    Ok(Url::parse(base_url)?.join(href.trim())?.to_string())
}

/// Artifact file name for a batch spanning `first..=last`
pub fn artifact_name(first: u64, last: u64) -> String {
    format!("data{}-{}.csv", first, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_page_url() {
        let url = listing_page_url("https://elibrary.ru", "org_items.asp", 1193, 7).unwrap();
        assert_eq!(
            url.as_str(),
            "https://elibrary.ru/org_items.asp?orgsid=1193&pagenum=7"
        );
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("https://www.elibrary.ru", "/item.asp?id=123").unwrap(),
            "https://www.elibrary.ru/item.asp?id=123"
        );
        assert!(absolute_url("nonsense", "/item.asp").is_err());
    }

    #[test]
    fn test_absolute_url_base_with_path() {
        assert_eq!(
            absolute_url("https://mirror.example.org/elib/", "/item.asp?id=5").unwrap(),
            "https://mirror.example.org/item.asp?id=5"
        );
        assert_eq!(
            absolute_url("https://mirror.example.org/elib/", "item.asp?id=5").unwrap(),
            "https://mirror.example.org/elib/item.asp?id=5"
        );
        assert_eq!(
            absolute_url("https://www.elibrary.ru", "  /item.asp?id=9 ").unwrap(),
            "https://www.elibrary.ru/item.asp?id=9"
        );
    }

    #[test]
    fn test_artifact_name() {
        assert_eq!(artifact_name(101, 205), "data101-205.csv");
    }
}
