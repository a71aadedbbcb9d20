use super::Translator;
use crate::error::BoxError;
use crate::{Error, FieldValue, Result};

/// Adapter turning a closure into a [`Translator`].
///
/// The value and the full tag argument (custom tag name plus any `,extra`
/// data) are passed through untouched. Errors are wrapped as
/// [`Error::Custom`] with the tag. The engine adds no caching here.
pub struct FnTranslator<F> {
    f: F,
}

/// Wrap `f` as a custom translator for `register_translator`.
pub fn translator_fn<F>(f: F) -> FnTranslator<F>
where
    F: Fn(&FieldValue, &str, &str) -> Result<String, BoxError> + Send + Sync,
{
    FnTranslator { f }
}

impl<F> Translator for FnTranslator<F>
where
    F: Fn(&FieldValue, &str, &str) -> Result<String, BoxError> + Send + Sync,
{
    fn translate(&self, value: &FieldValue, field: &str, tag: &str) -> Result<String> {
        (self.f)(value, field, tag).map_err(|source| Error::Custom { tag: tag.to_string(), source })
    }
}

impl<F> std::fmt::Debug for FnTranslator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnTranslator(<function>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_arguments_verbatim() {
        let t = translator_fn(|value, field, tag| Ok(format!("{field}={value} [{tag}]")));
        assert_eq!(t.translate(&FieldValue::Int(5), "user_id", "user,nick").unwrap(), "user_id=5 [user,nick]");
    }

    #[test]
    fn errors_carry_the_tag() {
        let t = translator_fn(|_, _, _| Err("boom".into()));
        let err = t.translate(&"x".into(), "f", "user,nick").unwrap_err();
        assert!(matches!(&err, Error::Custom { tag, .. } if tag == "user,nick"));
        assert_eq!(err.to_string(), "translator 'user,nick' failed: boom");
    }
}
