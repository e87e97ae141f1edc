use crate::error::OsmosisError;

/// Prefix of every denom created through tokenfactory
pub const DENOM_PREFIX: &str = "factory";

/// Longest subdenom the tokenfactory module accepts
pub const MAX_SUBDENOM_LEN: usize = 44;

/// Subdenoms may be empty, otherwise up to 44 characters out of `[0-9a-zA-Z./]`
pub fn validate_subdenom(subdenom: &str) -> Result<(), OsmosisError> {
    let valid = subdenom.len() <= MAX_SUBDENOM_LEN
        && subdenom
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '/');
    if valid {
        Ok(())
    } else {
        Err(OsmosisError::InvalidSubdenom {
            subdenom: subdenom.to_string(),
        })
    }
}

/// Builds `factory/{creator}/{subdenom}`. This is a pure function, it says
/// nothing about whether the denom was ever created.
pub fn full_denom(creator: &str, subdenom: &str) -> Result<String, OsmosisError> {
    validate_subdenom(subdenom)?;
    if creator.is_empty() || creator.contains('/') {
        return Err(OsmosisError::InvalidDenom {
            denom: format!("{}/{}/{}", DENOM_PREFIX, creator, subdenom),
            message: "creator must be a non-empty address".to_string(),
        });
    }
    Ok(format!("{}/{}/{}", DENOM_PREFIX, creator, subdenom))
}

/// Splits a factory denom back into `(creator, subdenom)`
pub fn parse_factory_denom(denom: &str) -> Result<(&str, &str), OsmosisError> {
    let invalid = |message: &str| OsmosisError::InvalidDenom {
        denom: denom.to_string(),
        message: message.to_string(),
    };
    let rest = denom
        .strip_prefix(DENOM_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| invalid("missing factory prefix"))?;
    let (creator, subdenom) = rest
        .split_once('/')
        .ok_or_else(|| invalid("expected factory/{creator}/{subdenom}"))?;
    if creator.is_empty() {
        return Err(invalid("empty creator"));
    }
    validate_subdenom(subdenom)?;
    Ok((creator, subdenom))
}
