/// Builds the instruction sent to the generative provider for one headphone.
///
/// The wording is tunable; the JSON shape it asks for is what
/// [`super::contract::parse_synthesis`] enforces.
pub fn build_prompt(brand: &str, model: &str) -> String {
    format!(
        r#"You are a demanding, experienced headphone enthusiast.
The user owns the {brand} {model}.

1. Report its hardware facts: form factor, connection, release year, launch price and driver configuration.
2. List 2 to 4 short tags describing its sound character.
3. Pick ONE audiophile test track that best shows off those characteristics, written as "Title - Artist".
4. Write a short, objective summary telling the listener what detail to focus on in that track.

Reply with a single JSON object and nothing else, using exactly this schema:
{{
  "specs": {{
    "form_factor": "string",
    "connection": "string",
    "year": "string",
    "price": "string",
    "driver": "string"
  }},
  "sound_features": ["string"],
  "song_query": "string",
  "summary": "string"
}}
Use "Unknown" for any fact you are not sure about."#
    )
}
