// Tauri IPC commands exposed to the frontend.

use slash_parser::bridge::ParserStatus;

use crate::AppParserState;

/// Forward one text string to the parse bridge. Returns the assigned
/// request id immediately; the parse trees arrive later as a
/// `slash://parse-result` event. Rejected while the pipeline is loading
/// or after a failed load.
#[tauri::command]
pub async fn parse(state: tauri::State<'_, AppParserState>, text: String) -> Result<u64, String> {
    state.submit(text).await.map_err(|error| error.to_string())
}

#[tauri::command]
pub async fn parser_status(
    state: tauri::State<'_, AppParserState>,
) -> Result<ParserStatus, String> {
    Ok(state.status().await)
}
