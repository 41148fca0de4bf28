use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// The fixed set of models published by the LLM7.io free tier.
///
/// The service swaps models in and out without notice; this list mirrors what
/// the selection UI offers. An identifier outside this set is rejected before
/// any network call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Gpt4oMini,
    Gpt4o,
    GptO3Mini,
    Qwen25Coder32b,
    Llama33_70bInstruct,
    Llama4Scout17b,
    MistralSmall2503,
    UnityMistralLarge,
    Midijourney,
    Rtist,
    SearchGpt,
    Evil,
    DeepseekR1Qwen32b,
    DeepseekR1DistillLlama70b,
    Llama31_8b,
    Phi4,
    Llama32_11b,
    Pixtral12b,
    Gemini20Flash,
    Gemini20FlashThinking,
    Hormoz8b,
    HypnosisTracy7b,
    MistralRoblox,
    RobloxRp,
    DeepseekV3,
    DeepseekR1,
    QwenQwq32b,
    Sur,
    LlamaScaleway,
    OpenaiAudio,
}

impl Model {
    /// Every supported model, in the order the selection UI lists them.
    pub const ALL: &'static [Model] = &[
        Model::Gpt4oMini,
        Model::Gpt4o,
        Model::GptO3Mini,
        Model::Qwen25Coder32b,
        Model::Llama33_70bInstruct,
        Model::Llama4Scout17b,
        Model::MistralSmall2503,
        Model::UnityMistralLarge,
        Model::Midijourney,
        Model::Rtist,
        Model::SearchGpt,
        Model::Evil,
        Model::DeepseekR1Qwen32b,
        Model::DeepseekR1DistillLlama70b,
        Model::Llama31_8b,
        Model::Phi4,
        Model::Llama32_11b,
        Model::Pixtral12b,
        Model::Gemini20Flash,
        Model::Gemini20FlashThinking,
        Model::Hormoz8b,
        Model::HypnosisTracy7b,
        Model::MistralRoblox,
        Model::RobloxRp,
        Model::DeepseekV3,
        Model::DeepseekR1,
        Model::QwenQwq32b,
        Model::Sur,
        Model::LlamaScaleway,
        Model::OpenaiAudio,
    ];

    /// The identifier sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Gpt4oMini => "gpt-4o-mini-2024-07-18",
            Model::Gpt4o => "gpt-4o",
            Model::GptO3Mini => "gpt-o3-mini",
            Model::Qwen25Coder32b => "qwen2.5-coder-32b-instruct:int8",
            Model::Llama33_70bInstruct => "llama-3.3-70b-instruct-fp8-fast",
            Model::Llama4Scout17b => "llama-4-scout-17b-16e-instruct",
            Model::MistralSmall2503 => "mistral-small-2503",
            Model::UnityMistralLarge => "unity-mistral-large",
            Model::Midijourney => "midijourney",
            Model::Rtist => "rtist",
            Model::SearchGpt => "searchgpt",
            Model::Evil => "evil",
            Model::DeepseekR1Qwen32b => "deepseek-r1-qwen:32b",
            Model::DeepseekR1DistillLlama70b => "deepseek-r1-distill-llama-70b:fp8",
            Model::Llama31_8b => "llama3.1:8b",
            Model::Phi4 => "phi-4",
            Model::Llama32_11b => "llama3.2:11b",
            Model::Pixtral12b => "pixtral:12b",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Gemini20FlashThinking => "gemini-2.0-flash-thinking",
            Model::Hormoz8b => "hormoz:8b",
            Model::HypnosisTracy7b => "hypnosis-tracy:7b",
            Model::MistralRoblox => "mistral-roblox",
            Model::RobloxRp => "roblox-rp",
            Model::DeepseekV3 => "deepseek-v3",
            Model::DeepseekR1 => "deepseek-r1",
            Model::QwenQwq32b => "qwen-qwq-32b",
            Model::Sur => "sur",
            Model::LlamaScaleway => "llama-scaleway",
            Model::OpenaiAudio => "openai-audio",
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Gpt4oMini
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::ALL
            .iter()
            .copied()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| Error::invalid_configuration(format!("unsupported model '{s}'")))
    }
}

// On the wire a model is just its identifier string, so serde goes through
// `as_str` / `FromStr` rather than the variant names.
impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let identifier = String::deserialize(deserializer)?;
        identifier.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_every_identifier() {
        for model in Model::ALL {
            assert_eq!(model.as_str().parse::<Model>().unwrap(), *model);
        }
    }

    #[test]
    fn test_rejects_unknown_model() {
        let err = "gpt-99-ultra".parse::<Model>().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert!(err.to_string().contains("gpt-99-ultra"));
    }

    #[test]
    fn test_serde_uses_the_wire_identifier() {
        let json = serde_json::to_string(&Model::DeepseekV3).unwrap();
        assert_eq!(json, "\"deepseek-v3\"");

        let model: Model = serde_json::from_str("\"gpt-4o\"").unwrap();
        assert_eq!(model, Model::Gpt4o);

        let err = serde_json::from_str::<Model>("\"gpt-99-ultra\"").unwrap_err();
        assert!(err.to_string().contains("unsupported model"));
    }

    #[test]
    fn test_default_is_the_free_tier_default() {
        assert_eq!(Model::default().as_str(), "gpt-4o-mini-2024-07-18");
    }
}
