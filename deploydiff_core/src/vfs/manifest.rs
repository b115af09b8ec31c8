use std::collections::BTreeMap;

/// Parses the main section of a JAR manifest.
///
/// The main section ends at the first blank line. Each header is written as
/// `Name: value`, and a line starting with a single space continues the value
/// of the previous attribute.
pub fn parse_main_attributes(content: &str) -> Result<BTreeMap<String, String>, String> {
    let mut attributes = BTreeMap::new();
    let mut current: Option<(String, String)> = None;

    for (index, line) in content.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            break;
        }

        if let Some(continuation) = line.strip_prefix(' ') {
            match current.as_mut() {
                Some((_, value)) => value.push_str(continuation),
                None => return Err(format!("line {}: continuation without attribute", index + 1)),
            }
            continue;
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| format!("line {}: invalid header field", index + 1))?;
        if !is_valid_name(name) {
            return Err(format!("line {}: invalid attribute name '{}'", index + 1, name));
        }
        let value = value
            .strip_prefix(' ')
            .ok_or_else(|| format!("line {}: missing space after '{}:'", index + 1, name))?;

        if let Some((name, value)) = current.take() {
            attributes.insert(name, value);
        }
        current = Some((name.to_string(), value.to_string()));
    }

    if let Some((name, value)) = current {
        attributes.insert(name, value);
    }
    Ok(attributes)
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_main_section() {
        let content = "Manifest-Version: 1.0\r\nCreated-By: Maven JAR Plugin 3.3.0\r\nBuild-Jdk-Spec: 17\r\n\r\n";
        let attributes = parse_main_attributes(content).unwrap();
        assert_eq!(attributes.len(), 3);
        assert_eq!(attributes["Created-By"], "Maven JAR Plugin 3.3.0");
        assert_eq!(attributes["Build-Jdk-Spec"], "17");
    }

    #[test]
    fn test_continuation_lines() {
        let content = "Manifest-Version: 1.0\nExport-Package: org.example.core,org.exam\n ple.util\nBundle-Name: core\n";
        let attributes = parse_main_attributes(content).unwrap();
        assert_eq!(attributes["Export-Package"], "org.example.core,org.example.util");
        assert_eq!(attributes["Bundle-Name"], "core");
    }

    #[test]
    fn test_stops_at_first_section() {
        let content = "Manifest-Version: 1.0\n\nName: org/example/\nSealed: true\n";
        let attributes = parse_main_attributes(content).unwrap();
        assert_eq!(attributes.len(), 1);
        assert!(!attributes.contains_key("Sealed"));
    }

    #[test]
    fn test_empty_value() {
        let attributes = parse_main_attributes("Manifest-Version: 1.0\nClass-Path: \n").unwrap();
        assert_eq!(attributes["Class-Path"], "");
    }

    #[test]
    fn test_invalid_lines() {
        assert!(parse_main_attributes("no separator here\n").is_err());
        assert!(parse_main_attributes(" leading continuation\n").is_err());
        assert!(parse_main_attributes("Bad Name: value\n").is_err());
    }

    #[test]
    fn test_requires_space_after_colon() {
        let result = parse_main_attributes("Manifest-Version: 1.0\nCreated-By:Maven\n");
        assert_eq!(result, Err("line 2: missing space after 'Created-By:'".to_string()));
        assert!(parse_main_attributes("Class-Path:\n").is_err());
    }
}
