/// Boundary 檔名的 profile 分類。
///
/// 檔名須包含 `__ENTSOE_<profile>BD_` 標記並以 `.xml` 結尾，標記前後可有任意字元，
/// 例如 `20191106T0930Z__ENTSOE_EQBD_001.xml` 屬於 `EQ`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileMatcher {
    profile: String,
    marker: String,
}

const XML_SUFFIX: &str = ".xml";

impl ProfileMatcher {
    pub fn new(profile: &str) -> Self {
        Self {
            profile: profile.to_string(),
            marker: format!("__ENTSOE_{}BD_", profile),
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn matches(&self, filename: &str) -> bool {
        // 標記必須完整出現在 `.xml` 後綴之前
        filename
            .strip_suffix(XML_SUFFIX)
            .is_some_and(|stem| stem.contains(&self.marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_profile_marker() {
        let eq = ProfileMatcher::new("EQ");
        let tp = ProfileMatcher::new("TP");

        assert!(eq.matches("20191106T0930Z__ENTSOE_EQBD_001.xml"));
        assert!(!tp.matches("20191106T0930Z__ENTSOE_EQBD_001.xml"));
        assert!(tp.matches("20191106T0930Z__ENTSOE_TPBD_001.xml"));
    }

    #[test]
    fn test_requires_xml_suffix() {
        let eq = ProfileMatcher::new("EQ");

        assert!(!eq.matches("20191106T0930Z__ENTSOE_EQBD_001.zip"));
        assert!(!eq.matches("20191106T0930Z__ENTSOE_EQBD_001.xml.bak"));
    }

    #[test]
    fn test_marker_may_sit_anywhere_before_suffix() {
        let eq = ProfileMatcher::new("EQ");

        assert!(eq.matches("__ENTSOE_EQBD_.xml"));
        assert!(eq.matches("prefix/20201106T0930Z__ENTSOE_EQBD_002-final.xml"));
        assert!(!eq.matches("20191106T0930Z_ENTSOE_EQBD_001.xml"));
        assert!(!eq.matches("boundary.xml"));
    }

    #[test]
    fn test_generic_over_profile_token() {
        let ssh = ProfileMatcher::new("SSH");

        assert_eq!(ssh.marker(), "__ENTSOE_SSHBD_");
        assert!(ssh.matches("x__ENTSOE_SSHBD_1.xml"));
    }
}
