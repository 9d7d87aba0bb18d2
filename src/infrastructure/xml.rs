//! XML codec for the topic document.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <topics title="Mathbase">
//!   <topic title="Algebra">
//!     <content type="geogebra" source="algebra/linear.ggb"/>
//!     <topic title="Linear Equations"/>
//!   </topic>
//! </topics>
//! ```

use std::path::Path;

use quick_xml::se::Serializer;
use serde::Serialize;

use crate::domain::TopicDocument;
use crate::infrastructure::error::{InfraError, InfraResult};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const ROOT_TAG: &str = "topics";

/// Serialize a document, indented by two spaces. `path` is only used for
/// error messages.
pub fn render_document(document: &TopicDocument, path: &Path) -> InfraResult<String> {
    let mut body = String::new();
    let mut serializer =
        Serializer::with_root(&mut body, Some(ROOT_TAG)).map_err(|e| InfraError::xml(path, e))?;
    serializer.indent(' ', 2);
    document
        .serialize(serializer)
        .map_err(|e| InfraError::xml(path, e))?;

    Ok(format!("{XML_DECLARATION}\n{body}\n"))
}

/// Parse a document. Unknown elements and attributes are ignored.
pub fn parse_document(xml: &str, path: &Path) -> InfraResult<TopicDocument> {
    quick_xml::de::from_str(xml).map_err(|e| InfraError::xml(path, e))
}
