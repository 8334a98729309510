//! Screen-transition state machine wrapped around the gameplay core: title
//! menu, options (volume), credits, the run itself, and the ending screen.

use meteors_core::sim::ExitReason;

pub const VOLUME_MAX: u8 = 10;
const DEFAULT_VOLUME: u8 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Title,
    Options,
    Credits,
    Gameplay,
    Ending,
}

/// Title menu entries, in display order.
pub const MENU_ITEMS: [MenuItem; 4] = [
    MenuItem::Play,
    MenuItem::Options,
    MenuItem::Credits,
    MenuItem::Quit,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Play,
    Options,
    Credits,
    Quit,
}

/// Per-frame menu navigation flags, decoupled from gameplay input.
#[derive(Clone, Copy, Debug, Default)]
pub struct MenuInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub select: bool,
    pub back: bool,
}

impl MenuInput {
    pub fn up() -> Self {
        Self {
            up: true,
            ..Self::default()
        }
    }

    pub fn down() -> Self {
        Self {
            down: true,
            ..Self::default()
        }
    }

    pub fn left() -> Self {
        Self {
            left: true,
            ..Self::default()
        }
    }

    pub fn right() -> Self {
        Self {
            right: true,
            ..Self::default()
        }
    }

    pub fn select() -> Self {
        Self {
            select: true,
            ..Self::default()
        }
    }

    pub fn back() -> Self {
        Self {
            back: true,
            ..Self::default()
        }
    }
}

pub struct ScreenFlow {
    screen: Screen,
    cursor: usize,
    volume: u8,
    quit: bool,
}

impl Default for ScreenFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenFlow {
    pub fn new() -> Self {
        Self {
            screen: Screen::Title,
            cursor: 0,
            volume: DEFAULT_VOLUME,
            quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn highlighted(&self) -> MenuItem {
        MENU_ITEMS[self.cursor]
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn wants_quit(&self) -> bool {
        self.quit
    }

    /// Advances the menu screens by one input frame. Gameplay frames are
    /// stepped by the session driver instead; see [`Self::finish_gameplay`].
    pub fn handle(&mut self, input: MenuInput) {
        match self.screen {
            Screen::Title => self.handle_title(input),
            Screen::Options => self.handle_options(input),
            Screen::Credits | Screen::Ending => {
                if input.select || input.back {
                    self.screen = Screen::Title;
                }
            }
            Screen::Gameplay => {}
        }
    }

    /// Routes a finished run: game over shows the ending screen, a manual
    /// quit drops straight back to the title.
    pub fn finish_gameplay(&mut self, reason: ExitReason) {
        self.screen = match reason {
            ExitReason::GameOver => Screen::Ending,
            ExitReason::Quit => Screen::Title,
        };
    }

    fn handle_title(&mut self, input: MenuInput) {
        let len = MENU_ITEMS.len();
        if input.up {
            self.cursor = (self.cursor + len - 1) % len;
        }
        if input.down {
            self.cursor = (self.cursor + 1) % len;
        }
        if input.select {
            match self.highlighted() {
                MenuItem::Play => self.screen = Screen::Gameplay,
                MenuItem::Options => self.screen = Screen::Options,
                MenuItem::Credits => self.screen = Screen::Credits,
                MenuItem::Quit => self.quit = true,
            }
        }
    }

    fn handle_options(&mut self, input: MenuInput) {
        if input.left {
            self.volume = self.volume.saturating_sub(1);
        }
        if input.right && self.volume < VOLUME_MAX {
            self.volume += 1;
        }
        if input.back || input.select {
            self.screen = Screen::Title;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cursor_wraps_in_both_directions() {
        let mut flow = ScreenFlow::new();
        assert_eq!(flow.highlighted(), MenuItem::Play);

        flow.handle(MenuInput::up());
        assert_eq!(flow.highlighted(), MenuItem::Quit);

        flow.handle(MenuInput::down());
        assert_eq!(flow.highlighted(), MenuItem::Play);

        for _ in 0..MENU_ITEMS.len() {
            flow.handle(MenuInput::down());
        }
        assert_eq!(flow.highlighted(), MenuItem::Play);
    }

    #[test]
    fn selecting_menu_items_transitions_screens() {
        let mut flow = ScreenFlow::new();
        flow.handle(MenuInput::select());
        assert_eq!(flow.screen(), Screen::Gameplay);

        let mut flow = ScreenFlow::new();
        flow.handle(MenuInput::down());
        flow.handle(MenuInput::select());
        assert_eq!(flow.screen(), Screen::Options);

        let mut flow = ScreenFlow::new();
        flow.handle(MenuInput::down());
        flow.handle(MenuInput::down());
        flow.handle(MenuInput::select());
        assert_eq!(flow.screen(), Screen::Credits);
        flow.handle(MenuInput::back());
        assert_eq!(flow.screen(), Screen::Title);
    }

    #[test]
    fn quit_entry_raises_the_quit_flag() {
        let mut flow = ScreenFlow::new();
        flow.handle(MenuInput::up());
        flow.handle(MenuInput::select());
        assert!(flow.wants_quit());
    }

    #[test]
    fn volume_clamps_to_its_range() {
        let mut flow = ScreenFlow::new();
        flow.handle(MenuInput::down());
        flow.handle(MenuInput::select());
        assert_eq!(flow.screen(), Screen::Options);

        for _ in 0..20 {
            flow.handle(MenuInput::right());
        }
        assert_eq!(flow.volume(), VOLUME_MAX);

        for _ in 0..30 {
            flow.handle(MenuInput::left());
        }
        assert_eq!(flow.volume(), 0);

        flow.handle(MenuInput::back());
        assert_eq!(flow.screen(), Screen::Title);
    }

    #[test]
    fn gameplay_outcome_routes_the_next_screen() {
        let mut flow = ScreenFlow::new();
        flow.handle(MenuInput::select());
        flow.finish_gameplay(ExitReason::GameOver);
        assert_eq!(flow.screen(), Screen::Ending);

        flow.handle(MenuInput::select());
        assert_eq!(flow.screen(), Screen::Title);

        flow.handle(MenuInput::select());
        flow.finish_gameplay(ExitReason::Quit);
        assert_eq!(flow.screen(), Screen::Title);
    }
}
