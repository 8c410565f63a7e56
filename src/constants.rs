//! Application constants
//!
//! Centralized location for the VERA persona, prompt catalogs and defaults.

/// Application name
pub const APP_NAME: &str = "VERA";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// System instruction sent with every text generation request
pub const SYSTEM_INSTRUCTION: &str = "\
Ты — VERA. Глубокая женская мудрость, эмпатия и тишина.\n\
Твой стиль: эстетичный, метафоричный, без клише и поучений.\n\
Формат: короткие блоки текста, разделенные пустой строкой.\n\
Никаких эмодзи (кроме исключительных случаев), никаких заголовков.";

/// Predefined situations shown on the Home screen
pub const SITUATIONS: [&str; 6] = [
    "Я устала",
    "Мне больно",
    "Я скучаю",
    "Я выбираю себя",
    "Нужно тепло",
    "Хочу тишины",
];

/// A letter type: stable id, visible label and the seed prompt
pub struct LetterType {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const LETTER_TYPES: [LetterType; 4] = [
    LetterType {
        id: "support",
        label: "Письмо поддержки",
        prompt: "Напиши мне письмо поддержки",
    },
    LetterType {
        id: "future",
        label: "Себе будущей",
        prompt: "Напиши письмо мне будущей",
    },
    LetterType {
        id: "hard",
        label: "Если сейчас тяжело",
        prompt: "Письмо для момента, когда опускаются руки",
    },
    LetterType {
        id: "life",
        label: "Письмо от жизни",
        prompt: "Представь, что Жизнь пишет мне письмо",
    },
];

/// An image style: stable id, visible label and the style descriptor
/// appended to the user's prompt
pub struct ImageStyle {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const IMAGE_STYLES: [ImageStyle; 8] = [
    ImageStyle {
        id: "none",
        label: "Свободный",
        prompt: "high quality, detailed, 8k",
    },
    ImageStyle {
        id: "realistic",
        label: "Реализм",
        prompt: "photorealistic, 8k, highly detailed, cinematic lighting, photography, shot on 35mm lens, depth of field",
    },
    ImageStyle {
        id: "3d",
        label: "3D Рендер",
        prompt: "3d render, unreal engine 5, octane render, isometric, cute, plastic texture, soft lighting, pixar style",
    },
    ImageStyle {
        id: "watercolor",
        label: "Акварель",
        prompt: "Soft watercolor painting, pastel colors, dreamy, wet on wet technique, artstation",
    },
    ImageStyle {
        id: "oil",
        label: "Масло",
        prompt: "Oil painting, textured, warm lighting, expressive strokes, classical art style",
    },
    ImageStyle {
        id: "dream",
        label: "Сон",
        prompt: "Surreal, cloudy, soft focus, magical realism, ethereal light, pastel gradient",
    },
    ImageStyle {
        id: "anime",
        label: "Аниме",
        prompt: "Anime style, studio ghibli, makoto shinkai, detailed background, atmospheric",
    },
    ImageStyle {
        id: "nature",
        label: "Ботаника",
        prompt: "Botanical illustration, organic shapes, flowers and leaves, calming green and beige tones, minimalist",
    },
];

/// Tag filters offered on the Library screen ("Все" matches everything)
pub const LIBRARY_FILTERS: [&str; 5] = ["Все", "Любовь", "Боль", "Тишина", "Сила"];

/// Onboarding slides shown after the splash (title, subtitle)
pub const ONBOARDING_STEPS: [(&str, &str); 4] = [
    (
        "Ты не обязана быть сильной всегда",
        "Позволь себе просто быть",
    ),
    (
        "Здесь можно чувствовать",
        "Твои эмоции важны, безопасны и услышаны.",
    ),
    (
        "Слова — как поддержка",
        "Находи утешение в ежедневных словах, которые отзываются в сердце.",
    ),
    (
        "Мы здесь для тебя",
        "VERA — это место, где тебя понимают. Без осуждения, только поддержка.",
    ),
];
