#![forbid(unsafe_code)]

//! XML namespace constants.

/// Namespace of the registry configuration document.
pub const CONFIGURATION: &str = "http://www.xmlsecurity.org/NS/#configuration";

/// XML Digital Signature namespace
pub const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

/// XML Digital Signature 1.1 namespace
pub const DSIG11: &str = "http://www.w3.org/2009/xmldsig11#";

/// XML Encryption namespace
pub const ENC: &str = "http://www.w3.org/2001/04/xmlenc#";

/// Exclusive C14N namespace
pub const EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

/// XPath Filter 2.0 namespace
pub const XPATH2: &str = "http://www.w3.org/2002/06/xmldsig-filter2";

/// XPath Filter 2.0 namespace from the 2002/04 draft
pub const XPATH2_DRAFT: &str = "http://www.w3.org/2002/04/xmldsig-filter2";

/// Experimental extensions namespace
pub const EXPERIMENTAL: &str = "http://www.xmlsecurity.org/experimental#";

/// Pre-standard XPath filter namespace
pub const XPATH_FILTER_LEGACY: &str =
    "http://www.nue.et-inf.uni-siegen.de/~geuer-pollmann/#xpathFilter";
