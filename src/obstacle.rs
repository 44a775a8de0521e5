use regex::Regex;

/// Decides from the page address whether the crawl ran into an anti-bot challenge
#[derive(Debug)]
pub struct ObstacleDetector {
    markers: Vec<Regex>,
}

impl Default for ObstacleDetector {
    fn default() -> Self {
        Self::new(&["page_captcha".to_string()]).expect("Default challenge marker should be valid")
    }
}

impl ObstacleDetector {
    /// Compile the marker patterns
    pub fn new(markers: &[String]) -> Result<Self, regex::Error> {
        let mut compiled = Vec::with_capacity(markers.len());
        for pattern in markers {
            compiled.push(Regex::new(pattern)?);
        }

        Ok(Self { markers: compiled })
    }

    /// True when the current location is a challenge interstitial
    pub fn is_blocked(&self, current_url: &str) -> bool {
        let blocked = self.markers.iter().any(|marker| marker.is_match(current_url));
        if blocked {
            ::log::debug!("Challenge marker matched: {}", current_url);
        }
        blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_marker() {
        let detector = ObstacleDetector::default();

        assert!(detector.is_blocked("https://elibrary.ru/page_captcha.asp?rpage=x"));
        assert!(!detector.is_blocked(
            "https://elibrary.ru/org_items.asp?orgsid=1193&pagenum=3"
        ));
    }

    #[test]
    fn test_custom_markers() {
        let detector =
            ObstacleDetector::new(&[r"/challenge/".to_string(), r"[?&]verify=1".to_string()])
                .unwrap();

        assert!(detector.is_blocked("https://example.org/challenge/start"));
        assert!(detector.is_blocked("https://example.org/list?page=2&verify=1"));
        assert!(!detector.is_blocked("https://example.org/list?page=2"));
    }

    #[test]
    fn test_no_markers_never_blocks() {
        let detector = ObstacleDetector::new(&[]).unwrap();
        assert!(!detector.is_blocked("https://example.org/page_captcha"));
    }

    #[test]
    fn test_invalid_marker() {
        assert!(ObstacleDetector::new(&["(unclosed".to_string()]).is_err());
    }
}
