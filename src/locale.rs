use crate::config::Language;

/// Fixed user-facing text for one display language.
#[derive(Debug)]
pub struct Strings {
    pub banner: &'static str,
    pub chart_fallback: &'static str,
    pub chart_title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub dataset_label: &'static str,
    pub not_connected: &'static str,
    pub affirmative: &'static [&'static str],
}

const KOREAN: Strings = Strings {
    banner: "간단한 차트봇 API 실행중! 🤖📊",
    chart_fallback: "차트를 만들어드릴게요! 📊",
    chart_title: "데이터 차트",
    x_label: "항목",
    y_label: "값",
    dataset_label: "데이터",
    not_connected: "Ollama가 연결되지 않았습니다. 'ollama serve' 명령어로 시작해주세요.",
    affirmative: &["예", "차트", "chart"],
};

const ENGLISH: Strings = Strings {
    banner: "Simple chart bot API is running! 🤖📊",
    chart_fallback: "I'll make you a chart! 📊",
    chart_title: "Data Chart",
    x_label: "Item",
    y_label: "Value",
    dataset_label: "Data",
    not_connected: "Ollama is not connected. Start it with 'ollama serve'.",
    affirmative: &["yes", "chart"],
};

impl Language {
    pub fn strings(self) -> &'static Strings {
        match self {
            Language::Korean => &KOREAN,
            Language::English => &ENGLISH,
        }
    }

    pub fn classification_prompt(self, message: &str) -> String {
        match self {
            Language::Korean => format!(
                "\n사용자가 \"{message}\"라고 말했습니다.\n\n\
                 차트를 만들어달라고 요청하고 있나요? \n\
                 간단히 \"예\" 또는 \"아니오\"로 답하고, 친근한 한국어 응답을 해주세요.\n\n\
                 예시:\n예, 차트를 만들어드릴게요!\n"
            ),
            Language::English => format!(
                "\nThe user said \"{message}\".\n\n\
                 Are they asking for a chart? \n\
                 Answer briefly with \"yes\" or \"no\" and reply warmly in English.\n\n\
                 Example:\nYes, I'll make you a chart!\n"
            ),
        }
    }

    pub fn conversation_prompt(self, message: &str) -> String {
        match self {
            Language::Korean => {
                format!("사용자가 '{message}'라고 말했습니다. 친근하게 한국어로 간단히 답해주세요.")
            }
            Language::English => {
                format!("The user said '{message}'. Reply warmly and briefly in English.")
            }
        }
    }

    pub fn handler_failure(self, detail: &str) -> String {
        match self {
            Language::Korean => format!("오류가 발생했습니다: {detail}"),
            Language::English => format!("An error occurred: {detail}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_embed_the_user_message() {
        for language in [Language::Korean, Language::English] {
            assert!(language.classification_prompt("a 1 b 2").contains("a 1 b 2"));
            assert!(language.conversation_prompt("hello").contains("'hello'"));
        }
    }
}
