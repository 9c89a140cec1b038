//! Fixed reply texts and prompt assembly.

use crate::models::GenerationContext;

pub const EMPTY_MESSAGE_REPLY: &str = "Boş mesaj aldım.";

pub const URGENT_REPLY: &str = "Acil risk ifadesi tespit edildi. Lütfen acil durumdaysanız 112’yi arayın ve en yakın sağlık kuruluşuna başvurun. (Bu sistem tıbbi teşhis koymaz.)";

pub const ROUTE_MISSING_REPLY: &str =
    "Şikâyetini biraz daha detaylandırırsan uygun branşı önerebilirim.";

pub const LAB_REPLY: &str = "Laboratuvar değerleri yaş/cinsiyet/öykü bağlamında yorumlanır. Lütfen parametre adını, değerini, birimini ve referans aralığını yaz.";

pub const GENERAL_REPLY: &str = "Şu anda yanıt üretilemiyor.";

pub fn route_reply(department_name: &str) -> String {
    format!("Ön değerlendirme: {} uygun görünebilir.", department_name)
}

const SYSTEM_RULES_EN: &str = "You are a calm, friendly health support assistant for a clinic.
Rules:
- Answer in English only.
- Use 2 to 4 sentences.
- Do not ask questions.
- Never suggest medication, doses or treatments.
- Offer safe everyday self-care advice.
- You may suggest seeing a doctor from the department in the context.";

const TRANSLATE_RULES_TR: &str = "Sakin ve samimi bir sağlık destek asistanısın.
Kurallar:
- Yalnızca Türkçe yaz.
- 2-4 cümle kullan.
- Soru sorma.
- İlaç adı, doz veya tedavi önerme.
- Sayıları, birimleri ve 112 numarasını değiştirme.";

/// User turn for the model, with retrieved snippets as bullet notes ahead
/// of the message when there are any.
pub fn user_prompt(snippets: &[String], message: &str) -> String {
    let mut prompt = String::new();
    if !snippets.is_empty() {
        prompt.push_str("Notes:\n");
        for snippet in snippets {
            prompt.push_str("- ");
            prompt.push_str(snippet.trim());
            prompt.push('\n');
        }
        prompt.push('\n');
    }
    prompt.push_str("User message:\n");
    prompt.push_str(message.trim());
    prompt
}

pub fn generation_prompt(prompt: &str, context: &GenerationContext) -> String {
    let context_json = serde_json::to_string(context).unwrap_or_else(|_| "{}".to_string());
    format!(
        "{}\n\n[CONTEXT]\n{}\n[/CONTEXT]\n\n{}\n\nAnswer:",
        SYSTEM_RULES_EN, context_json, prompt
    )
}

pub fn translation_prompt(english: &str) -> String {
    format!(
        "{}\n\nAşağıdaki metni kurallara uyarak Türkçeye çevir:\n{}\n\nTürkçe yanıt:",
        TRANSLATE_RULES_TR,
        english.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationTask;
    use shared_models::DepartmentRef;

    #[test]
    fn snippets_become_bullets_before_the_message() {
        let prompt = user_prompt(
            &["Ferritin demir deposunu gösterir.".to_string(), " B12 eksikliği ".to_string()],
            "ferritin düşük",
        );
        assert_eq!(
            prompt,
            "Notes:\n- Ferritin demir deposunu gösterir.\n- B12 eksikliği\n\nUser message:\nferritin düşük"
        );
    }

    #[test]
    fn user_prompt_without_snippets_is_just_the_message() {
        assert_eq!(user_prompt(&[], " merhaba "), "User message:\nmerhaba");
    }

    #[test]
    fn generation_prompt_embeds_task_and_department() {
        let context = GenerationContext::for_department(DepartmentRef {
            code: "kbb".to_string(),
            name: "Kulak Burun Boğaz".to_string(),
        });
        let prompt = generation_prompt("boğazım ağrıyor", &context);

        assert!(prompt.contains("\"task\":\"department_routing\""));
        assert!(prompt.contains("\"code\":\"kbb\""));
        assert!(prompt.ends_with("boğazım ağrıyor\n\nAnswer:"));
    }

    #[test]
    fn context_without_department_omits_it() {
        let prompt = generation_prompt("merhaba", &GenerationContext::task(GenerationTask::GeneralHealthInfo));
        assert!(prompt.contains("{\"task\":\"general_health_info\"}"));
    }

    #[test]
    fn route_reply_names_the_department() {
        assert_eq!(
            route_reply("Ortopedi / Fizik Tedavi"),
            "Ön değerlendirme: Ortopedi / Fizik Tedavi uygun görünebilir."
        );
    }
}
