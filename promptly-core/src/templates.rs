use serde::Serialize;
use thiserror::Error;

/// Token replaced by the user's text when a template is rendered.
pub const PLACEHOLDER: &str = "{user_prompt}";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown enhancement mode '{0}'")]
    NotFound(String),
}

/// A named enhancement mode: the instructions sent to the model, with one
/// placeholder for the user's prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnhancementTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub template: &'static str,
    pub description: &'static str,
}

impl EnhancementTemplate {
    pub fn render(&self, user_text: &str) -> String {
        render(self.template, user_text)
    }
}

/// Replaces the first occurrence of [`PLACEHOLDER`] with `user_text`.
///
/// The user's text is inserted verbatim and never re-scanned, so a
/// placeholder inside `user_text` survives as-is. Templates without a
/// placeholder are returned unchanged.
pub fn render(template: &str, user_text: &str) -> String {
    template.replacen(PLACEHOLDER, user_text, 1)
}

static BUILTIN_TEMPLATES: [EnhancementTemplate; 4] = [
    EnhancementTemplate {
        id: "creative",
        name: "Creative",
        template: "Kamu adalah AI Creative Prompt Engineer. Tugasmu adalah meningkatkan kualitas prompt berikut agar menjadi lebih imajinatif, ekspresif, dan kaya detail sensorik (visual, suara, tekstur, emosi). Gunakan gaya bahasa yang hidup, inspiratif, dan penuh kreativitas, namun tetap mudah dipahami AI. Pastikan prompt siap dipakai langsung tanpa harus diubah lagi. Prompt awal: {user_prompt}. Berikan hasil akhir prompt dalam format final yang singkat, jelas, dan tidak ada penjelasan tambahan.",
        description: "Lebih imajinatif dan ekspresif; cocok untuk ide/art/gaya bahasa hidup.",
    },
    EnhancementTemplate {
        id: "precise",
        name: "Precise",
        template: "Kamu adalah AI Precision Engineer. Tugasmu adalah meningkatkan kualitas prompt berikut agar lebih fokus, jelas, dan bebas ambiguitas. Hapus bagian yang tidak relevan, tambahkan detail yang penting, dan pastikan instruksi mudah diikuti AI. Gunakan bahasa yang tegas, ringkas, dan langsung ke inti. Prompt awal: {user_prompt}. Berikan hasil akhir prompt dalam format final yang jelas, ringkas, dan tepat sasaran.",
        description: "Paling ringkas dan tegas; cocok untuk instruksi teknis/step-by-step.",
    },
    EnhancementTemplate {
        id: "academic",
        name: "Academic",
        template: "Kamu adalah AI Academic Prompt Engineer. Tugasmu adalah meningkatkan kualitas prompt berikut agar sesuai dengan standar akademik atau ilmiah. Gunakan bahasa formal, struktur yang logis, dan tambahkan konteks relevan agar prompt siap dipakai untuk penulisan akademik, riset, atau laporan. Hindari bahasa sehari-hari dan pastikan hasilnya konsisten. Prompt awal: {user_prompt}. Berikan hasil akhir prompt dalam format final dengan gaya akademik yang rapi dan formal.",
        description: "Bahasa formal dan terstruktur; cocok untuk riset, laporan, dokumen resmi.",
    },
    EnhancementTemplate {
        id: "image",
        name: "Image AI",
        template: "Kamu adalah AI Visual Prompt Engineer. Tugasmu adalah mengubah prompt berikut menjadi deskriptif, detail, dan siap dipakai untuk generator gambar AI. Fokus pada elemen visual: gaya seni, suasana, pencahayaan, komposisi, warna, dan detail artistik. Hindari kata abstrak yang tidak bisa divisualisasikan. Buat hasilnya deskriptif tapi ringkas agar mudah dipakai. Prompt awal: {user_prompt}. Berikan hasil akhir prompt dalam format final yang siap dipakai pada AI art generator.",
        description: "Untuk generator gambar; fokus pada detail visual, gaya, cahaya, komposisi.",
    },
];

/// The fixed, ordered catalogue of enhancement modes.
#[derive(Debug, Clone, Copy)]
pub struct TemplateRegistry {
    templates: &'static [EnhancementTemplate],
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateRegistry {
    pub fn builtin() -> Self {
        Self {
            templates: &BUILTIN_TEMPLATES,
        }
    }

    pub fn list(&self) -> &'static [EnhancementTemplate] {
        self.templates
    }

    pub fn get(&self, id: &str) -> Result<&'static EnhancementTemplate, TemplateError> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    pub fn default_template(&self) -> &'static EnhancementTemplate {
        &self.templates[0]
    }

    /// The template after `current` in catalogue order, wrapping around.
    pub fn next_after(&self, current: &str) -> &'static EnhancementTemplate {
        let index = self
            .templates
            .iter()
            .position(|t| t.id == current)
            .map(|i| (i + 1) % self.templates.len())
            .unwrap_or(0);
        &self.templates[index]
    }
}
