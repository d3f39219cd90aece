//! Timer routing

use crate::commands::Cmd;
use crate::messages::TimerMsg;
use crate::model::AppModel;
use crate::timer::TimerId;

use super::grid::{fetch_timed_out, scroll_idle};

pub fn update_timer(model: &mut AppModel, msg: TimerMsg) -> Option<Cmd> {
    match msg {
        TimerMsg::Fired { timer, token } => match timer {
            TimerId::FetchTimeout(grid_id) => fetch_timed_out(model, &grid_id, token),
            TimerId::ScrollIdle(grid_id) => scroll_idle(model, &grid_id, token),
        },
    }
}
