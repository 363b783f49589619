use crate::app::state::ViewState;

pub struct DataCollectionHandler;

impl DataCollectionHandler {
    /// 取出所有待处理输入并折叠，顺序：偏移、姿态、加速度
    pub fn handle_updates(state: &mut ViewState) {
        let offsets: Vec<_> = match &state.channels.offset {
            Some(watch) => watch.receiver().try_iter().collect(),
            None => Vec::new(),
        };
        for offset in offsets {
            state.apply_offset(offset);
        }

        let raws = match &state.channels.orientation {
            Some(sub) => sub.drain(),
            None => Vec::new(),
        };
        for raw in raws {
            state.apply_raw(raw);
        }

        let forces = match &state.channels.acceleration {
            Some(sub) => sub.drain(),
            None => Vec::new(),
        };
        for g in forces {
            state.apply_g_force(g);
        }
        state.refresh_peak();
    }
}
