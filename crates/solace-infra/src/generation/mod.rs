//! Generation adapters and the config-driven factory.

pub mod openai;

use secrecy::SecretString;
use solace_core::generation::box_generator::BoxGenerator;
use solace_core::generation::static_reply::StaticGenerator;
use solace_core::turn::orchestrator::DEFAULT_REPLY;
use solace_types::config::{GenerationConfig, GenerationKind};
use tracing::{info, warn};

use self::openai::OpenAiGenerator;

/// Build the generator named by `config`.
///
/// A missing API key does not stop startup: the static generator is used
/// instead so turns still complete with the default reply.
pub fn create_generator(config: &GenerationConfig) -> BoxGenerator {
    match config.kind {
        GenerationKind::Openai => match read_api_key(&config.api_key_env) {
            Some(key) => {
                info!(model = %config.model, base_url = %config.base_url, "Using OpenAI-compatible generator");
                BoxGenerator::new(OpenAiGenerator::new(config, &key))
            }
            None => {
                warn!(
                    env = %config.api_key_env,
                    "No generation API key set, falling back to static replies"
                );
                BoxGenerator::new(static_generator(config))
            }
        },
        GenerationKind::Static => BoxGenerator::new(static_generator(config)),
    }
}

fn static_generator(config: &GenerationConfig) -> StaticGenerator {
    StaticGenerator::new(config.static_reply.as_deref().unwrap_or(DEFAULT_REPLY))
}

/// Read a secret from the named environment variable. Empty and non-Unicode
/// values count as unset.
pub fn read_api_key(env_name: &str) -> Option<SecretString> {
    match std::env::var(env_name) {
        Ok(value) if !value.trim().is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::generation::generator::Generator;

    #[test]
    fn test_static_kind_uses_configured_reply() {
        let config = GenerationConfig {
            kind: GenerationKind::Static,
            static_reply: Some("I hear you.".to_string()),
            ..Default::default()
        };
        let generator = create_generator(&config);
        assert_eq!(generator.name(), "static");
    }

    #[test]
    fn test_missing_key_falls_back_to_static() {
        let config = GenerationConfig {
            api_key_env: "SOLACE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        let generator = create_generator(&config);
        assert_eq!(generator.name(), "static");
    }

    #[tokio::test]
    async fn test_static_fallback_replies_with_default() {
        let generator = create_generator(&GenerationConfig {
            kind: GenerationKind::Static,
            ..Default::default()
        });
        let reply = generator.generate("hello", &[]).await.unwrap();
        assert_eq!(reply, DEFAULT_REPLY);
    }

    #[test]
    fn test_read_api_key_unset() {
        assert!(read_api_key("SOLACE_TEST_KEY_THAT_IS_NEVER_SET").is_none());
    }
}
