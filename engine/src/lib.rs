pub mod app;
pub mod graphics;
pub mod pixels_renderer;
pub mod regression;
pub mod surface;

/// Deterministic, side-effect-free game logic: a pure step function over an
/// owned state value.
///
/// Implementations drive both the headful shell and headless tests, so `step`
/// must not touch wall-clock time, global RNGs, or I/O.
pub trait GameLogic {
    type State;
    type Input;

    fn initial_state(&self) -> Self::State;
    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State;
}

/// Steps a `GameLogic` while recording every state it passes through.
///
/// The recorded history is what the regression helpers hash against goldens.
#[derive(Debug)]
pub struct HeadlessRunner<G: GameLogic> {
    game: G,
    states: Vec<G::State>,
}

impl<G: GameLogic> HeadlessRunner<G> {
    pub fn new(game: G) -> Self {
        let initial_state = game.initial_state();
        Self {
            game,
            states: vec![initial_state],
        }
    }

    /// Index of the latest frame (0 is the initial state).
    pub fn frame(&self) -> usize {
        self.states.len() - 1
    }

    pub fn state(&self) -> &G::State {
        &self.states[self.states.len() - 1]
    }

    pub fn history(&self) -> &[G::State] {
        &self.states
    }

    pub fn step(&mut self, input: G::Input) -> usize {
        let next_state = self.game.step(self.state(), input);
        self.states.push(next_state);
        self.frame()
    }

    pub fn run<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = G::Input>,
    {
        let mut last_frame = self.frame();
        for input in inputs {
            last_frame = self.step(input);
        }
        last_frame
    }
}
