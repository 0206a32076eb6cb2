//! Instruction text sent alongside the two reference images.

/// Fixed instruction template. The model is prompted in Portuguese.
pub const PROMPT_TEMPLATE: &str = "Use a primeira imagem como referência do rosto e do corpo da pessoa, mantendo sua aparência natural, cor de pele, cabelo e proporções. Use a segunda imagem como referência do look (roupa, acessórios, sapatos), incluindo detalhes de cores, texturas e estilo.
Gere uma imagem realista, corpo inteiro, combinando o rosto da primeira imagem com o look da segunda imagem.
Mantenha proporções naturais, iluminação consistente e pose neutra, como se a pessoa estivesse vestindo o look. Não altere o rosto nem aplique efeitos irreais.";

/// Builds the prompt, appending the user's details verbatim when non-empty.
///
/// Only the empty string counts as "no details"; whitespace is kept as typed.
pub fn build_prompt(details: &str) -> String {
    if details.is_empty() {
        return PROMPT_TEMPLATE.to_string();
    }
    format!(
        "{PROMPT_TEMPLATE}\n\nAdicione os seguintes detalhes opcionais descritos pelo usuário: {details}."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_details_is_exact_template() {
        assert_eq!(build_prompt(""), PROMPT_TEMPLATE);
        assert!(!build_prompt("").contains("Adicione"));
    }

    #[test]
    fn test_details_are_appended_verbatim() {
        let prompt = build_prompt("com óculos de sol, em um parque");
        assert!(prompt.starts_with(PROMPT_TEMPLATE));
        assert!(prompt.ends_with(
            "\n\nAdicione os seguintes detalhes opcionais descritos pelo usuário: com óculos de sol, em um parque."
        ));
    }

    #[test]
    fn test_details_are_not_escaped() {
        let details = "\"quoted\" {braces} \\n <tag>";
        assert!(build_prompt(details).contains(details));
    }

    #[test]
    fn test_template_has_three_paragraph_lines() {
        assert_eq!(PROMPT_TEMPLATE.lines().count(), 3);
    }
}
