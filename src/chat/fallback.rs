const GREETING_KEYWORDS: [&str; 4] = ["slm", "salut", "bonjour", "azul"];
const TRANSLATION_KEYWORDS: [&str; 3] = ["tradu", "translat", "ⴰⵙⵓⵖⵍ"];

pub const GREETING_FALLBACK: &str = "ⵣ Azul fella-k ! (Le backend rencontre des difficultés)";
pub const TRANSLATION_FALLBACK: &str =
    "ⵜⴰⵙⵓⵖⵍⵜ : la traduction nécessite le serveur. Réessayez dans quelques instants.";
pub const DEFAULT_FALLBACK: &str =
    "ⵜⴰⵏⵎⵉⵔⵜ ! Problème de connexion au serveur. Réponse locale : Je peux vous aider avec la langue et culture Amazighe.";

/// Local reply used when the backend cannot answer. Plain substring match, first rule wins.
pub fn generate_fallback_response(user_message: &str) -> &'static str {
    let lower = user_message.to_lowercase();
    if GREETING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        GREETING_FALLBACK
    } else if TRANSLATION_KEYWORDS.iter().any(|k| lower.contains(k)) {
        TRANSLATION_FALLBACK
    } else {
        DEFAULT_FALLBACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greetings_win_regardless_of_case() {
        assert_eq!(generate_fallback_response("BONJOUR !"), GREETING_FALLBACK);
        assert_eq!(generate_fallback_response("Azul fellawen"), GREETING_FALLBACK);
        assert_eq!(generate_fallback_response("slm"), GREETING_FALLBACK);
    }

    #[test]
    fn greeting_takes_precedence_over_translation() {
        assert_eq!(
            generate_fallback_response("Traduis \"bonjour\" en Tamazight"),
            GREETING_FALLBACK
        );
    }

    #[test]
    fn translation_requests_get_their_own_line() {
        assert_eq!(generate_fallback_response("Peux-tu traduire ce mot ?"), TRANSLATION_FALLBACK);
        assert_eq!(generate_fallback_response("translate tree"), TRANSLATION_FALLBACK);
    }

    #[test]
    fn anything_else_gets_the_default() {
        assert_eq!(generate_fallback_response("Parle-moi de Yennayer"), DEFAULT_FALLBACK);
        assert_eq!(generate_fallback_response(""), DEFAULT_FALLBACK);
    }
}
