#![forbid(unsafe_code)]

//! Process-wide initialization from a configuration named in the
//! environment. Kept in its own test binary so the variable and the global
//! registry are not shared with other tests.

use ulriksdal::core::algorithm;
use ulriksdal::init::{InitMode, CONFIG_ENV};

const OVERRIDE: &str = r#"<?xml version="1.0"?>
<Configuration xmlns="http://www.xmlsecurity.org/NS/#configuration">
  <TransformAlgorithms>
    <TransformAlgorithm URI="http://www.w3.org/2000/09/xmldsig#base64"
                        JAVACLASS="ulriksdal::transforms::Base64Decode"/>
  </TransformAlgorithms>
  <SignatureAlgorithms>
    <SignatureAlgorithm URI="http://www.w3.org/2001/04/xmldsig-more#hmac-sha256"
                        JAVACLASS="ulriksdal::crypto::HmacSha256"/>
  </SignatureAlgorithms>
</Configuration>"#;

#[test]
fn test_init_from_env_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("override-config.xml");
    std::fs::write(&path, OVERRIDE).unwrap();
    let path = path.to_str().unwrap().to_owned();

    std::env::set_var(CONFIG_ENV, &path);
    let result = ulriksdal::init();
    std::env::remove_var(CONFIG_ENV);
    let report = result.unwrap();

    assert_eq!(report.mode, InitMode::Configuration { path });
    assert_eq!(report.errors().count(), 0);

    let registry = ulriksdal::global();
    assert!(registry.is_initialized());
    assert!(registry.transforms().contains(algorithm::BASE64));
    assert!(!registry.transforms().contains(algorithm::C14N));
    assert!(registry.signatures().contains(algorithm::HMAC_SHA256));
    assert!(!registry.signatures().contains(algorithm::HMAC_SHA1));
}
