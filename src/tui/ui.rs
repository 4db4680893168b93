use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, TitleBar};

/// Draws title bar, conversation and input box top to bottom.
/// The input box takes the rows it needs; the conversation gets the rest.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, frame_index: usize) {
    use Constraint::{Length, Min};

    let input_height = tui.input_box.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    MessageList::new(
        &mut tui.message_list,
        app.view.messages(),
        app.view.is_typing(),
        frame_index,
    )
    .render(frame, main_area);

    TitleBar::new(
        app.service_label.clone(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content(),
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);
}
