use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomSettingError {
    #[error("expected <group>.<key>=<value>, found no '.'")]
    MissingGroup,

    #[error("expected <group>.<key>=<value>, found no '='")]
    MissingValue,

    #[error("group name is empty")]
    EmptyGroup,

    #[error("key name is empty")]
    EmptyKey,
}

/// A parsed `<group>.<key>=<value>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomSettingInput {
    pub group: String,
    pub key: String,
    pub value: String,
}

impl CustomSettingInput {
    /// Splits on the first `.`, then on the first `=` after it.
    ///
    /// The value may be empty and may itself contain `.` or `=`.
    pub fn parse(raw: &str) -> Result<Self, CustomSettingError> {
        let (group, rest) = raw
            .trim()
            .split_once('.')
            .ok_or(CustomSettingError::MissingGroup)?;
        let (key, value) = rest
            .split_once('=')
            .ok_or(CustomSettingError::MissingValue)?;

        let group = group.trim();
        let key = key.trim();
        if group.is_empty() {
            return Err(CustomSettingError::EmptyGroup);
        }
        if key.is_empty() {
            return Err(CustomSettingError::EmptyKey);
        }

        Ok(Self {
            group: group.to_string(),
            key: key.to_string(),
            value: value.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_group_key_and_value() {
        let input = CustomSettingInput::parse("runelite.fpsTarget=50").unwrap();
        assert_eq!(input.group, "runelite");
        assert_eq!(input.key, "fpsTarget");
        assert_eq!(input.value, "50");
    }

    #[test]
    fn value_may_contain_separators() {
        let input = CustomSettingInput::parse(" grp.url=https://a.b/c?x=1 ").unwrap();
        assert_eq!(input.group, "grp");
        assert_eq!(input.key, "url");
        assert_eq!(input.value, "https://a.b/c?x=1");
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            CustomSettingInput::parse("novalue"),
            Err(CustomSettingError::MissingGroup)
        );
        assert_eq!(
            CustomSettingInput::parse("grp.key"),
            Err(CustomSettingError::MissingValue)
        );
        assert_eq!(
            CustomSettingInput::parse(".key=1"),
            Err(CustomSettingError::EmptyGroup)
        );
        assert_eq!(
            CustomSettingInput::parse("grp.=1"),
            Err(CustomSettingError::EmptyKey)
        );
    }
}
