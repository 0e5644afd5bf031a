//! Command dispatcher owning the per-tick cycle.
//!
//! # Tick cycle
//!
//! [`Session::on_tick`] is invoked exactly once per fixed simulation step,
//! single-threaded, with no reentrancy. Each tick:
//!
//! 1. At most one pending command is drained from the transport
//!    (non-blocking). Buffered bursts are applied one per tick, in arrival
//!    order, never coalesced.
//! 2. The command, if any, is classified and routed to the Step, Reset or
//!    Configure handler. Unknown kinds are a no-op for the tick.
//! 3. Unconditional housekeeping runs regardless of command presence:
//!    the robot and sensor ports advance their per-tick internal state.
//!
//! Error handling is permissive by design: malformed or oversized action
//! vectors are clamped rather than rejected, a failed send is logged and the
//! tick proceeds, and each tick is independent with respect to transport
//! errors.
use crate::{
    build_observation, CollisionKind, CollisionTracker, Command, CommandKind, ConfigResponse,
    ControlMode, Observation, RobotPort, SensorPort, SubscriberId, TargetPort, Transport,
    MAX_ACTION_SLOTS,
};
use log::{debug, info, warn};

/// The command dispatcher and control-mode owner of the bridge.
///
/// All collaborating subsystems are injected as port implementations at
/// construction, so the dispatcher can be exercised against test doubles
/// without touching the concrete backends.
pub struct Session<R, S, T, N>
where
    R: RobotPort,
    S: SensorPort,
    T: TargetPort,
    N: Transport,
{
    robot: R,
    sensor: S,
    target: T,
    transport: N,
    mode: ControlMode,
    collisions: CollisionTracker,
    collision_sub: Option<SubscriberId>,
    reset_listeners: Vec<Box<dyn FnMut()>>,
}

impl<R, S, T, N> Session<R, S, T, N>
where
    R: RobotPort,
    S: SensorPort,
    T: TargetPort,
    N: Transport,
{
    /// Builds a session around the given port implementations.
    ///
    /// The session subscribes a logging handler to the collision stream for
    /// its lifetime; the subscription is released on [`shutdown`](Self::shutdown).
    pub fn new(robot: R, sensor: S, target: T, transport: N) -> Self {
        let mut collisions = CollisionTracker::new();
        let collision_sub = Some(collisions.subscribe(|kind, tag| {
            debug!("Collision detected: {:?} with {}", kind, tag);
        }));

        Self {
            robot,
            sensor,
            target,
            transport,
            mode: ControlMode::default(),
            collisions,
            collision_sub,
            reset_listeners: Vec::new(),
        }
    }

    /// Runs one fixed simulation step.
    pub fn on_tick(&mut self) {
        if let Some(cmd) = self.transport.try_recv() {
            match cmd.classify() {
                Some(CommandKind::Step) => self.handle_step(&cmd),
                Some(CommandKind::Reset) => self.handle_reset(),
                Some(CommandKind::Configure) => self.handle_configure(&cmd),
                None => debug!("Ignoring command with unknown kind {}", cmd.kind),
            }
        }

        // Housekeeping runs every tick, command or not.
        self.robot.tick();
        self.sensor.tick();
    }

    /// Reports a collision event from the host physics into the tracker.
    pub fn on_collision(&mut self, kind: CollisionKind, tag: &str) {
        self.collisions.on_collision(kind, tag);
    }

    /// Registers a fire-and-forget listener notified after every completed
    /// Reset.
    pub fn subscribe_reset_completed<F>(&mut self, listener: F)
    where
        F: FnMut() + 'static,
    {
        self.reset_listeners.push(Box::new(listener));
    }

    /// Current control mode.
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Releases the collision subscription and closes the transport.
    ///
    /// No command processing occurs afterwards.
    pub fn shutdown(&mut self) {
        if let Some(id) = self.collision_sub.take() {
            self.collisions.unsubscribe(id);
        }
        self.transport.shutdown();
    }

    fn handle_step(&mut self, cmd: &Command) {
        let current = self.robot.joint_angles();
        let num_joints = current.len();
        let mut next = current.clone();

        // Only the first five (or fewer) slots are ever RL-actuated; the
        // remaining joints keep their authoritative reading bit-identical.
        let applied = cmd.actions.len().min(MAX_ACTION_SLOTS).min(num_joints);
        for (i, delta) in cmd.actions.iter().take(applied).enumerate() {
            next[i] = current[i] + delta;
        }

        match self.mode {
            ControlMode::Training => self.robot.set_joints_instantaneous(&next),
            ControlMode::Simulation => self.robot.set_joints_interpolated(&next),
        }

        // Discretized intents. The thresholds differ deliberately: axis6
        // uses an inclusive comparison, the gripper a strict one.
        self.robot
            .set_axis6_orientation(cmd.axis6_orientation >= 0.5);
        self.robot.set_gripper_closed(cmd.gripper_close_value > 0.5);

        let obs = self.build(false);
        if let Err(e) = self.transport.send_observation(&obs) {
            warn!("Failed to send step observation: {}", e);
        }
    }

    fn handle_reset(&mut self) {
        self.robot.reset_home();
        self.collisions.clear();
        self.target.spawn_random();

        let obs = self.build(true);
        if let Err(e) = self.transport.send_observation(&obs) {
            warn!("Failed to send reset observation: {}", e);
        }

        for listener in self.reset_listeners.iter_mut() {
            listener();
        }
    }

    fn handle_configure(&mut self, cmd: &Command) {
        self.mode = if cmd.simulation_mode_enabled {
            ControlMode::Simulation
        } else {
            ControlMode::Training
        };
        self.robot.set_control_mode(self.mode);

        let response = match serde_json::to_string(&ConfigResponse::ok()) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize configuration response: {}", e);
                return;
            }
        };
        if let Err(e) = self.transport.send_response(&response) {
            warn!("Failed to send configuration response: {}", e);
        }

        info!("Control mode changed to {:?}", self.mode);
    }

    fn build(&self, is_reset_frame: bool) -> Observation {
        build_observation(
            &self.robot,
            &self.sensor,
            &self.target,
            &self.collisions,
            is_reset_frame,
        )
    }
}
