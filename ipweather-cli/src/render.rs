use ipweather_core::UiState;

/// Text shown for a published state.
pub fn render(state: &UiState) -> String {
    match state {
        UiState::Loading => "Locating you...".to_string(),
        UiState::Succeeded(result) => format!(
            "{city}\n{country}\n{temp}°\nicon {icon} ({url})",
            city = result.city,
            country = result.country_code,
            temp = result.temperature_display(),
            icon = result.condition_icon_id,
            url = result.icon_url(),
        ),
        UiState::Failed(info) => format!("Something went wrong\n{}", info.message),
    }
}
