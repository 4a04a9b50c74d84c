// Recording transport shared by the driver unit tests.

use std::vec::Vec;

use crate::transport::DisplayTransport;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Cmd(u8, Vec<u8>),
    Data(Vec<u8>),
}

#[derive(Debug, PartialEq, Eq)]
pub struct BusFault;

#[derive(Default)]
pub struct TestBus {
    pub ops: Vec<Op>,
    /// Number of data writes that succeed before every further one fails.
    pub data_budget: Option<usize>,
}

impl TestBus {
    pub fn failing_after(writes: usize) -> Self {
        Self { ops: Vec::new(), data_budget: Some(writes) }
    }

    pub fn data(&self) -> Vec<&[u8]> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Data(d) => Some(d.as_slice()),
                Op::Cmd(..) => None,
            })
            .collect()
    }

    pub fn commands(&self) -> Vec<(u8, &[u8])> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Cmd(c, p) => Some((*c, p.as_slice())),
                Op::Data(_) => None,
            })
            .collect()
    }
}

impl DisplayTransport for TestBus {
    type Error = BusFault;

    fn write_command(&mut self, command: u8) -> Result<(), BusFault> {
        self.ops.push(Op::Cmd(command, Vec::new()));
        Ok(())
    }

    fn write_command_with_params(&mut self, command: u8, params: &[u8]) -> Result<(), BusFault> {
        self.ops.push(Op::Cmd(command, params.to_vec()));
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), BusFault> {
        if let Some(left) = self.data_budget.as_mut() {
            if *left == 0 {
                return Err(BusFault);
            }
            *left -= 1;
        }
        self.ops.push(Op::Data(data.to_vec()));
        Ok(())
    }
}
