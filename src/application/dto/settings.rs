use serde::Deserialize;

/// Toggle update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequestDto {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub double_enabled: Option<bool>,
}
