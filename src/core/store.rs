use crate::domain::model::Matrix;

/// The closed set of updates the store accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixAction {
    /// Replace the current matrix wholesale (after a fetch or a cancel).
    SetOriginalMatrix { payload: Matrix },
    /// Replace the current matrix with `payload`, or with the zero-filled
    /// matrix when `reset_to_empty` is set.
    SetMatrix {
        payload: Option<Matrix>,
        reset_to_empty: bool,
    },
}

impl MatrixAction {
    pub fn set_original(payload: Matrix) -> Self {
        MatrixAction::SetOriginalMatrix { payload }
    }

    pub fn set(payload: Matrix) -> Self {
        MatrixAction::SetMatrix {
            payload: Some(payload),
            reset_to_empty: false,
        }
    }

    pub fn reset_to_empty() -> Self {
        MatrixAction::SetMatrix {
            payload: None,
            reset_to_empty: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MatrixState {
    pub matrix: Matrix,
}

pub fn reduce(state: MatrixState, action: MatrixAction) -> MatrixState {
    match action {
        MatrixAction::SetOriginalMatrix { payload } => MatrixState { matrix: payload },
        MatrixAction::SetMatrix {
            reset_to_empty: true,
            ..
        } => MatrixState {
            matrix: Matrix::empty(),
        },
        MatrixAction::SetMatrix {
            payload: Some(payload),
            ..
        } => MatrixState { matrix: payload },
        // 沒有 payload 也沒有 reset，狀態不變
        MatrixAction::SetMatrix { payload: None, .. } => state,
    }
}

/// 共享狀態容器：持有目前顯示的價格表。
///
/// Owned by the editor that mounts it; a new editor gets a new store.
#[derive(Debug, Clone, Default)]
pub struct MatrixStore {
    state: MatrixState,
}

impl MatrixStore {
    pub fn new(initial_matrix: Option<Matrix>) -> Self {
        Self {
            state: MatrixState {
                matrix: initial_matrix.unwrap_or_default(),
            },
        }
    }

    pub fn matrix(&self) -> &Matrix {
        &self.state.matrix
    }

    pub fn dispatch(&mut self, action: MatrixAction) {
        tracing::trace!("dispatch {:?}", action);
        self.state = reduce(self.state, action);
    }
}
