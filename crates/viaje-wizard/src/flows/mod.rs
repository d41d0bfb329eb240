pub mod itinerario_flow;
