// Slash Reader desktop entry point.
// Wraps the web frontend and bridges it to the parsing pipeline.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    slash_reader_desktop_lib::run();
}
