// Static application menu: labels and shortcut bindings only.

use tauri::{
    menu::{Menu, MenuBuilder, MenuEvent, MenuItemBuilder, PredefinedMenuItem, SubmenuBuilder},
    AppHandle, Manager, Runtime,
};

use crate::window::MAIN_WINDOW_LABEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    CloseWindow,
    QuitApp,
    ToggleFullscreen,
}

impl MenuAction {
    fn id(self) -> &'static str {
        match self {
            Self::CloseWindow => "menu.close-window",
            Self::QuitApp => "menu.quit-app",
            Self::ToggleFullscreen => "menu.toggle-fullscreen",
        }
    }

    fn from_menu_id(menu_id: &str) -> Option<Self> {
        match menu_id {
            "menu.close-window" => Some(Self::CloseWindow),
            "menu.quit-app" => Some(Self::QuitApp),
            "menu.toggle-fullscreen" => Some(Self::ToggleFullscreen),
            _ => None,
        }
    }
}

pub fn build_menu<R: Runtime, M: Manager<R>>(manager: &M) -> tauri::Result<Menu<R>> {
    let close_window = MenuItemBuilder::with_id(MenuAction::CloseWindow.id(), "Close Window")
        .accelerator("CmdOrCtrl+W")
        .build(manager)?;
    let quit_app = MenuItemBuilder::with_id(MenuAction::QuitApp.id(), "Quit Slash Reader")
        .accelerator("CmdOrCtrl+Q")
        .build(manager)?;

    let cut = PredefinedMenuItem::cut(manager, None)?;
    let copy = PredefinedMenuItem::copy(manager, None)?;
    let paste = PredefinedMenuItem::paste(manager, None)?;
    let select_all = PredefinedMenuItem::select_all(manager, None)?;
    let toggle_fullscreen =
        MenuItemBuilder::with_id(MenuAction::ToggleFullscreen.id(), "Toggle Full Screen")
            .accelerator("F11")
            .build(manager)?;
    let about = PredefinedMenuItem::about(manager, Some("About Slash Reader"), None)?;
    let separator = PredefinedMenuItem::separator(manager)?;

    let file_menu = SubmenuBuilder::new(manager, "File")
        .items(&[&close_window, &separator, &quit_app])
        .build()?;

    let edit_menu = SubmenuBuilder::new(manager, "Edit")
        .items(&[&cut, &copy, &paste, &separator, &select_all])
        .build()?;

    let view_menu = SubmenuBuilder::new(manager, "View").items(&[&toggle_fullscreen]).build()?;

    let help_menu = SubmenuBuilder::new(manager, "Help").items(&[&about]).build()?;

    MenuBuilder::new(manager).items(&[&file_menu, &edit_menu, &view_menu, &help_menu]).build()
}

pub fn handle_menu_event<R: Runtime>(app: &AppHandle<R>, event: MenuEvent) {
    let Some(action) = MenuAction::from_menu_id(event.id().as_ref()) else {
        return;
    };

    match action {
        MenuAction::CloseWindow => close_main_window(app),
        MenuAction::QuitApp => app.exit(0),
        MenuAction::ToggleFullscreen => toggle_main_window_fullscreen(app),
    }
}

fn close_main_window<R: Runtime>(app: &AppHandle<R>) {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        let _ = window.close();
    }
}

fn toggle_main_window_fullscreen<R: Runtime>(app: &AppHandle<R>) {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        if let Ok(fullscreen) = window.is_fullscreen() {
            let _ = window.set_fullscreen(!fullscreen);
        }
    }
}
